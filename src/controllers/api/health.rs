use crate::controllers::health::report;
use girder_core::{
    Container, Controller, ControllerType, Error, HttpRequest, HttpResponse, Injectable,
    Invocation, Namespace, async_trait, rest_method,
};
use girder_seaorm::LazyDatabase;

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
    fn default_method(&self, request: &HttpRequest) -> Option<&'static str> {
        rest_method(request)
    }

    async fn invoke(&self, method: &str, _call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "show" => report(&self.db).await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for Health {
    const NAMESPACE: Namespace = Namespace::Api;
    const NAME: &'static str = "Health";
    const METHODS: &'static [&'static str] = &["show"];
}
