//! `girder` command line: serve the demo application, run migrations or
//! list the registered controllers.

use clap::{Args, Parser, Subcommand};
use girder::{AppContext, AppError, migrations};
use girder_config::{ConfigError, ConfigStore};
use girder_core::Application;
use girder_log::{Format, Level, LogConfig, error, info};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "girder")]
#[command(version)]
#[command(about = "Front-controller web framework demo application")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the schema and optionally seed demo data
    Migrate(MigrateArgs),
    /// List registered controllers and their methods
    Routes(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Configuration file (INI, TOML or JSON)
    #[arg(short, long, env = "GIRDER_CONFIG", default_value = "config.ini")]
    config: PathBuf,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Listen host, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Args)]
struct MigrateArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Insert the demo blog posts when the table is empty
    #[arg(long)]
    seed: bool,
}

fn load_config(args: &ConfigArgs) -> Result<ConfigStore, AppError> {
    let store = ConfigStore::builder()
        .optional_file(&args.config)
        .dotenv(true)
        .env_prefix("GIRDER")
        .build()?;
    Ok(store)
}

/// Environment settings first, then the `[log]` section on top.
fn configure_logging(config: &ConfigStore) {
    let mut log = LogConfig::from_env();
    if let Some(level) = config.get("log.level").ok().and_then(|v| v.parse::<Level>().ok()) {
        log = log.level(level);
    }
    if let Some(format) = config.get("log.format").ok().and_then(|v| v.parse::<Format>().ok()) {
        log = log.format(format);
    }
    girder_log::configure(log);
    girder_log::tracing_bridge::install();
}

async fn serve(args: ServeArgs) -> Result<(), AppError> {
    let config = load_config(&args.config)?;
    configure_logging(&config);

    let host = match args.host {
        Some(host) => host,
        None => config.get_non_empty_or("server.host", "127.0.0.1").to_string(),
    };
    let port = match args.port {
        Some(port) => port,
        None => match config.get_int("server.port") {
            Ok(port) => u16::try_from(port)
                .map_err(|_| AppError::Address(format!("port {} is out of range", port)))?,
            Err(ConfigError::Missing(_)) => 8080,
            Err(err) => return Err(err.into()),
        },
    };
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| AppError::Address(format!("{}:{}", host, port)))?;

    let context = AppContext::new(config)?;
    info!(
        "Starting {} ({})",
        context.config.get_or("app.name", "girder"),
        context.config.get_or("app.environment", "development")
    );

    Application::new(context.dispatcher()).listen(addr).await?;
    Ok(())
}

async fn migrate(args: MigrateArgs) -> Result<(), AppError> {
    let config = load_config(&args.config)?;
    configure_logging(&config);

    let db_config = girder::bootstrap::database_config(&config)?;
    let db = girder_seaorm::Database::connect(db_config).await?;
    db.ping().await?;
    println!("Database connection successful");

    migrations::run(db.connection())
        .await
        .map_err(girder_seaorm::SeaOrmError::from)?;
    println!("Schema is up to date (blogs, samples)");

    if args.seed {
        let inserted = migrations::seed_blog_posts(db.connection())
            .await
            .map_err(girder_seaorm::SeaOrmError::from)?;
        println!("Seeded {} blog posts", inserted);
    }

    db.close().await?;
    Ok(())
}

fn routes(args: ConfigArgs) -> Result<(), AppError> {
    let config = load_config(&args)?;
    let context = AppContext::new(config)?;
    let dispatcher = context.dispatcher();

    for entry in dispatcher.registry().entries() {
        println!("{:<28} {}", entry.key, entry.methods.join(", "));
        for (path, method) in entry.routes {
            println!("{:<28}   {} -> {}", "", path, method);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Migrate(args) => migrate(args).await,
        Commands::Routes(args) => routes(args),
    };

    if let Err(err) = &result {
        error!("{}", err);
    }
    result.map_err(Into::into)
}
