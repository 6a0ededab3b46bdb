// Controller traits

use crate::{Container, Error, HttpRequest, HttpResponse, Injectable, Namespace, RoutingTarget};
use async_trait::async_trait;

/// Everything a controller method receives.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// The request, with `query_params` already populated.
    pub request: HttpRequest,
    pub target: RoutingTarget,
    /// Positional path arguments left after method selection.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// A request handler built fresh by the container for every request.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Method to run when the path does not name one.
    ///
    /// `None` falls back to the configured default method.
    fn default_method(&self, _request: &HttpRequest) -> Option<&'static str> {
        None
    }

    /// Run `method` (already canonical, one of the registered method names).
    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error>;
}

/// Static registration data for a controller type.
pub trait ControllerType: Controller + Injectable + 'static {
    const NAMESPACE: Namespace;
    /// Canonical name, e.g. `Home` or `Sample`.
    const NAME: &'static str;
    /// Public method names, in their canonical spelling.
    const METHODS: &'static [&'static str];
    /// Literal paths mapped to method names, checked before any other rule.
    const ROUTES: &'static [(&'static str, &'static str)] = &[];

    /// Container key, e.g. `controllers::api::Sample`.
    fn key() -> String {
        format!("{}::{}", Self::NAMESPACE.prefix(), Self::NAME)
    }
}

/// Default method for REST-style API controllers.
pub fn rest_method(request: &HttpRequest) -> Option<&'static str> {
    match request.method.as_str() {
        "GET" | "HEAD" => Some("show"),
        "POST" => Some("create"),
        "PUT" | "PATCH" => Some("update"),
        "DELETE" => Some("delete"),
        _ => None,
    }
}

/// Build `C` through the container and box it as a trait object.
pub(crate) fn build_controller<C: ControllerType>(
    container: &Container,
) -> Result<std::sync::Arc<dyn Controller>, Error> {
    container
        .build::<C>()
        .map(|controller| std::sync::Arc::new(controller) as std::sync::Arc<dyn Controller>)
}
