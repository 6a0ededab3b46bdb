//! Client errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HttpClientError>;

#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The server could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client or a request could not be put together.
    #[error("Failed to build request: {0}")]
    Build(String),

    /// A 4xx or 5xx response, see [`Response::error_for_status`](crate::Response::error_for_status).
    #[error("HTTP {status}: {message}")]
    Response { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HttpClientError {
    /// Classify a `reqwest` failure while sending or reading.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Status of a [`Response`](Self::Response) error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}
