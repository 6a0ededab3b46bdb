use thiserror::Error;

/// Failures of the database layer.
#[derive(Error, Debug)]
pub enum SeaOrmError {
    /// The database could not be opened, pinged or closed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed.
    #[error("{0}")]
    Database(#[from] sea_orm::DbErr),

    /// Creating the schema or seeding it failed.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl SeaOrmError {
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Database(sea_orm::DbErr::Conn(_))
        )
    }
}

pub type SeaOrmResult<T> = Result<T, SeaOrmError>;
