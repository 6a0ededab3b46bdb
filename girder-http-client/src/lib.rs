//! Outbound HTTP client for girder services.
//!
//! A thin layer over `reqwest`: a shared client with a base URL, default
//! headers and a default timeout, a request builder, and a response that is
//! read fully before it is handed back.
//!
//! ```rust,ignore
//! use girder_http_client::{HttpClient, HttpClientConfig};
//!
//! let client = HttpClient::new(
//!     HttpClientConfig::builder()
//!         .base_url("https://jsonplaceholder.typicode.com")
//!         .build(),
//! )?;
//!
//! let posts: serde_json::Value = client
//!     .get("/posts")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use request::RequestBuilder;
pub use response::Response;

pub use http::{Method, StatusCode};
