//! # girder
//!
//! A small front-controller web framework and its demo application.
//!
//! Requests are resolved from their URI into a controller, method and
//! arguments (`/{controller}/{method}/{args...}` and
//! `/api/{controller}/{args...}` with the HTTP verb picking the method),
//! the controller is built through the dependency-injection container and
//! its method runs against SeaORM models and the upstream JSONPlaceholder
//! API.
//!
//! ```rust,ignore
//! use girder::AppContext;
//! use girder_config::ConfigStore;
//!
//! let context = AppContext::new(ConfigStore::load("config.ini")?)?;
//! girder_core::Application::new(context.dispatcher())
//!     .listen("127.0.0.1:8080".parse()?)
//!     .await?;
//! ```
//!
//! The framework pieces live in their own crates and are re-exported here:
//! [`girder_core`] holds the resolver, container, dispatcher and server.

pub mod bootstrap;
pub mod controllers;
pub mod error;
pub mod migrations;
pub mod models;
pub mod services;
pub mod views;

pub use bootstrap::AppContext;
pub use error::AppError;

pub use girder_config;
pub use girder_core;
pub use girder_http_client;
pub use girder_log;
pub use girder_seaorm;
pub use girder_validation;
