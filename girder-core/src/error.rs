// Error types for the girder front controller

use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No binding registered for `{0}`")]
    BindingNotFound(String),

    #[error("Binding `{key}` does not produce `{expected}`")]
    BindingTypeMismatch { key: String, expected: &'static str },

    #[error("Cannot build `{target}`: dependency `{dependency}` is not resolvable")]
    UnresolvableDependency { target: String, dependency: String },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Controller not found: {0}")]
    ControllerNotFound(String),

    #[error("Method `{method}` not found on controller `{controller}`")]
    MethodNotFound { controller: String, method: String },

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Hyper(#[from] hyper::Error),
}

impl Error {
    /// HTTP status this error renders as.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidRoute(_) | Error::BadRequest(_) | Error::Deserialization(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::ControllerNotFound(_) | Error::MethodNotFound { .. } | Error::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Error::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::BindingNotFound(_)
            | Error::BindingTypeMismatch { .. }
            | Error::UnresolvableDependency { .. }
            | Error::Serialization(_)
            | Error::Template(_)
            | Error::Internal(_)
            | Error::Io(_)
            | Error::Hyper(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}
