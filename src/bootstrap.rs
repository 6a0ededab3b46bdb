//! Startup wiring: configuration, the lazy database, the upstream client,
//! the container and the dispatcher.

use crate::services::{DemoService, SampleStore};
use crate::views::Views;
use crate::{AppError, controllers, migrations};
use girder_config::{ConfigError, ConfigStore};
use girder_core::{Container, Dispatcher};
use girder_http_client::{HttpClient, HttpClientConfig};
use girder_log::{info, warn};
use girder_seaorm::{DatabaseConfig, LazyDatabase, SeaOrmError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_UPSTREAM_URL: &str = "https://jsonplaceholder.typicode.com";

/// Process-wide state, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ConfigStore>,
    pub database: LazyDatabase,
    pub http: HttpClient,
    pub views: Views,
}

impl AppContext {
    pub fn new(config: ConfigStore) -> Result<Self, AppError> {
        let database = lazy_database(&config)?;
        let http = upstream_client(&config)?;
        let views = Views::new()?;

        Ok(Self {
            config: Arc::new(config),
            database,
            http,
            views,
        })
    }

    /// Container with the shared handles and the services bound by type.
    pub fn container(&self) -> Container {
        let container = Container::new();

        let config = self.config.clone();
        container.bind(move || config.clone());
        let database = self.database.clone();
        container.bind(move || database.clone());
        let http = self.http.clone();
        container.bind(move || http.clone());
        let views = self.views.clone();
        container.bind(move || views.clone());

        container.bind_with(|c| c.build::<DemoService>());
        container.bind_with(|c| c.build::<SampleStore>());

        container
    }

    pub fn dispatcher(&self) -> Dispatcher {
        let config = &self.config;
        let mut builder = Dispatcher::builder(self.container())
            .default_controller(config.get_non_empty_or("defaults.controller", "Home"))
            .default_method(config.get_non_empty_or("defaults.method", "main"))
            .diagnostics(config.get_bool("app.debug").unwrap_or(false));

        if let Some(routes) = config.section("routes") {
            for (alias, controller) in routes {
                builder = builder.alias(alias, controller.clone());
            }
        }

        controllers::register(builder).build()
    }
}

/// Connection settings from `[database]`.
pub fn database_config(config: &ConfigStore) -> Result<DatabaseConfig, ConfigError> {
    let prefix = config.get_or("database.prefix", "");
    if !prefix.is_empty() {
        warn!("database.prefix `{}` is ignored: table names are fixed", prefix);
    }

    let driver = config.get_non_empty_or("database.driver", "sqlite");
    let db_config = match driver {
        "sqlite" => DatabaseConfig::sqlite(config.get_non_empty_or("database.database", ":memory:")),
        "mysql" => DatabaseConfig::new(server_url("mysql", 3306, config)?),
        "pgsql" | "postgres" | "postgresql" => {
            DatabaseConfig::new(server_url("postgres", 5432, config)?)
        }
        other => {
            return Err(ConfigError::InvalidValue {
                key: "database.driver".to_string(),
                message: format!("unsupported driver `{}` (sqlite, mysql, pgsql)", other),
            });
        }
    };

    match seconds(config, "database.connect_timeout")? {
        Some(timeout) => Ok(db_config.connect_timeout(timeout)),
        None => Ok(db_config),
    }
}

/// Optional whole-second duration.
fn seconds(config: &ConfigStore, path: &str) -> Result<Option<Duration>, ConfigError> {
    if !config.has(path) {
        return Ok(None);
    }
    let secs = config.get_int(path)?;
    u64::try_from(secs)
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| ConfigError::InvalidValue {
            key: path.to_string(),
            message: format!("`{}` is negative", secs),
        })
}

/// Server URL with the credentials and database name percent-encoded.
fn server_url(scheme: &str, default_port: i64, config: &ConfigStore) -> Result<String, ConfigError> {
    let invalid = |key: &str, message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let host = config.get_non_empty_or("database.host", "localhost");
    let port = config.get_int("database.port").unwrap_or(default_port);
    let name = match config.get_non_empty_or("database.name", "") {
        "" => config.get_or("database.database", ""),
        name => name,
    };
    let username = config.get_or("database.username", "");
    let password = config.get_or("database.password", "");

    let mut url = Url::parse(&format!("{}://{}:{}/", scheme, host, port))
        .map_err(|e| invalid("database.host", format!("`{}:{}`: {}", host, port, e)))?;
    url.path_segments_mut()
        .map_err(|_| invalid("database.host", format!("`{}` has no path", host)))?
        .pop_if_empty()
        .push(name);

    if !username.is_empty() {
        url.set_username(username)
            .map_err(|_| invalid("database.username", "cannot be set on this URL".to_string()))?;
        if !password.is_empty() {
            url.set_password(Some(password))
                .map_err(|_| invalid("database.password", "cannot be set on this URL".to_string()))?;
        }
    }

    if scheme == "mysql" {
        let charset = config.get_or("database.charset", "");
        if !charset.is_empty() {
            url.query_pairs_mut().append_pair("charset", charset);
        }
    }
    Ok(url.into())
}

/// Database handle that creates the schema, and optionally seeds the demo
/// posts, on first connection.
pub fn lazy_database(config: &ConfigStore) -> Result<LazyDatabase, ConfigError> {
    let db_config = database_config(config)?;
    let seed = match config.get("database.seed") {
        Ok(_) => config.get_bool("database.seed")?,
        Err(_) => true,
    };

    Ok(LazyDatabase::new(db_config).with_initializer(move |db| async move {
        let migration = |e: sea_orm::DbErr| SeaOrmError::Migration(e.to_string());
        migrations::run(db.connection()).await.map_err(migration)?;
        if seed {
            migrations::seed_blog_posts(db.connection())
                .await
                .map_err(migration)?;
        }
        info!("Database initialized");
        Ok(())
    }))
}

pub fn upstream_client(config: &ConfigStore) -> Result<HttpClient, AppError> {
    let base_url = config.get_non_empty_or("services.jsonplaceholder_url", DEFAULT_UPSTREAM_URL);
    let mut builder = HttpClientConfig::builder()
        .base_url(base_url)
        .default_header("Accept", "application/json");
    if let Some(timeout) = seconds(config, "services.timeout")? {
        builder = builder.timeout(timeout);
    }
    let client = HttpClient::new(builder.build())?;
    Ok(client)
}
