//! # girder SeaORM
//!
//! SeaORM connection management for girder applications.
//!
//! The application opens one connection per process, lazily, through
//! [`LazyDatabase`]. Handles are cheap to clone and can be bound into the
//! container so every controller shares the same pool.
//!
//! ```rust,ignore
//! use girder_seaorm::{DatabaseConfig, LazyDatabase};
//!
//! let db = LazyDatabase::new(DatabaseConfig::sqlite(":memory:"))
//!     .with_initializer(|db| async move { migrations::run(&db).await });
//!
//! let posts = blog_post::Entity::find().all(db.connection().await?).await?;
//! ```

mod config;
mod database;
mod error;

pub use config::*;
pub use database::*;
pub use error::*;

pub use sea_orm;
pub use sea_query;
