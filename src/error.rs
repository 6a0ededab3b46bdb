// Startup errors of the girder application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] girder_config::ConfigError),

    #[error(transparent)]
    Database(#[from] girder_seaorm::SeaOrmError),

    #[error(transparent)]
    HttpClient(#[from] girder_http_client::HttpClientError),

    #[error(transparent)]
    Server(#[from] girder_core::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Invalid listen address `{0}`")]
    Address(String),
}
