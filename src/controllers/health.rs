// Health check for load balancers

use chrono::Utc;
use girder_core::{
    Container, Controller, ControllerType, Error, HttpResponse, Injectable, Invocation, Namespace,
    async_trait,
};
use girder_log::warn;
use girder_seaorm::LazyDatabase;
use serde_json::json;

/// `{status, timestamp, database, version}`; 503 with `error` when the
/// database does not answer a ping.
pub(crate) async fn report(db: &LazyDatabase) -> Result<HttpResponse, Error> {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    match db.ping().await {
        Ok(()) => HttpResponse::json(
            200,
            &json!({
                "status": "ok",
                "timestamp": timestamp,
                "database": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(err) => {
            warn!("Health check failed: {}", err);
            HttpResponse::json(
                503,
                &json!({
                    "status": "unhealthy",
                    "timestamp": timestamp,
                    "database": "disconnected",
                    "error": err.to_string(),
                }),
            )
        }
    }
}

pub struct Health {
    db: LazyDatabase,
}

impl Injectable for Health {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            db: container.resolve()?,
        })
    }
}

#[async_trait]
impl Controller for Health {
    async fn invoke(&self, method: &str, _call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "main" => report(&self.db).await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for Health {
    const NAMESPACE: Namespace = Namespace::App;
    const NAME: &'static str = "Health";
    const METHODS: &'static [&'static str] = &["main"];
}
