//! Opening the pool once and sharing it.

use crate::{DatabaseConfig, SeaOrmError, SeaOrmResult};
use girder_log::{debug, info};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// An open connection pool plus the settings it was opened with.
#[derive(Clone)]
pub struct Database {
    conn: DatabaseConnection,
    config: Arc<DatabaseConfig>,
}

impl Database {
    pub async fn connect(config: DatabaseConfig) -> SeaOrmResult<Self> {
        let url = config.redacted_url();
        debug!("Connecting to {}", url);

        let conn = sea_orm::Database::connect(config.to_connect_options())
            .await
            .map_err(|e| SeaOrmError::Connection(format!("{}: {}", url, e)))?;

        info!("Connected to {} ({:?})", url, conn.get_database_backend());
        Ok(Self {
            conn,
            config: Arc::new(config),
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    pub async fn ping(&self) -> SeaOrmResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| SeaOrmError::Connection(e.to_string()))
    }

    pub async fn close(self) -> SeaOrmResult<()> {
        info!("Closing {}", self.config.redacted_url());
        self.conn
            .close()
            .await
            .map_err(|e| SeaOrmError::Connection(e.to_string()))
    }
}

type Initializer =
    Arc<dyn Fn(Database) -> Pin<Box<dyn Future<Output = SeaOrmResult<()>> + Send>> + Send + Sync>;

/// A process-wide connection opened on first use.
///
/// Clones share the same cell, so the connection (and the optional
/// initializer) runs at most once however many handles exist. A failed
/// attempt leaves the cell empty and the next caller tries again.
#[derive(Clone)]
pub struct LazyDatabase {
    config: Arc<DatabaseConfig>,
    cell: Arc<OnceCell<Database>>,
    initializer: Option<Initializer>,
}

impl LazyDatabase {
    /// Handle for `config`; nothing is opened yet.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Arc::new(config),
            cell: Arc::new(OnceCell::new()),
            initializer: None,
        }
    }

    /// Run `init` once, right after the connection is established and
    /// before any caller sees it.
    pub fn with_initializer<F, Fut>(mut self, init: F) -> Self
    where
        F: Fn(Database) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SeaOrmResult<()>> + Send + 'static,
    {
        self.initializer = Some(Arc::new(move |db| Box::pin(init(db))));
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The connection, opening it if needed.
    pub async fn get(&self) -> SeaOrmResult<&Database> {
        self.cell
            .get_or_try_init(|| async {
                let db = Database::connect((*self.config).clone()).await?;
                if let Some(init) = &self.initializer {
                    init(db.clone()).await?;
                }
                Ok::<_, SeaOrmError>(db)
            })
            .await
    }

    /// The underlying SeaORM connection, opening it if needed.
    pub async fn connection(&self) -> SeaOrmResult<&DatabaseConnection> {
        Ok(self.get().await?.connection())
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }

    /// Connect if needed, then ping.
    pub async fn ping(&self) -> SeaOrmResult<()> {
        self.get().await?.ping().await
    }
}

impl std::fmt::Debug for LazyDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyDatabase")
            .field("url", &self.config.redacted_url())
            .field("connected", &self.is_connected())
            .finish()
    }
}
