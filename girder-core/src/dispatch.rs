// Front controller: resolve, build, select, invoke

use crate::controller::build_controller;
use crate::{
    Container, Controller, ControllerType, Error, ErrorRenderer, HttpRequest, HttpResponse,
    Invocation, Namespace, RoutingTarget, UriResolver,
};
use girder_log::{debug, trace};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Registration record for one controller type.
#[derive(Debug, Clone)]
pub struct ControllerEntry {
    pub namespace: Namespace,
    pub name: &'static str,
    /// Container key the factory is bound under.
    pub key: String,
    pub methods: &'static [&'static str],
    pub routes: &'static [(&'static str, &'static str)],
}

impl ControllerEntry {
    /// Canonical spelling of `name` if this controller exposes it.
    pub fn method(&self, name: &str) -> Option<&'static str> {
        self.methods
            .iter()
            .copied()
            .find(|m| m.eq_ignore_ascii_case(name))
    }
}

/// Controllers known to a dispatcher, keyed by namespace and lowercase name.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    entries: HashMap<(Namespace, String), ControllerEntry>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `C` and bind its factory into `container`.
    pub fn register<C: ControllerType>(&mut self, container: &Container) {
        let key = C::key();
        container.set_with(key.clone(), build_controller::<C>);

        debug!("Registered controller {} with {} methods", key, C::METHODS.len());
        self.entries.insert(
            (C::NAMESPACE, C::NAME.to_ascii_lowercase()),
            ControllerEntry {
                namespace: C::NAMESPACE,
                name: C::NAME,
                key,
                methods: C::METHODS,
                routes: C::ROUTES,
            },
        );
    }

    pub fn find(&self, namespace: Namespace, name: &str) -> Option<&ControllerEntry> {
        self.entries.get(&(namespace, name.to_ascii_lowercase()))
    }

    /// All entries, ordered by container key.
    pub fn entries(&self) -> Vec<&ControllerEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    container: Container,
    registry: ControllerRegistry,
    default_controller: String,
    default_method: String,
    aliases: HashMap<String, String>,
    diagnostics: bool,
}

impl DispatcherBuilder {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            registry: ControllerRegistry::new(),
            default_controller: "Home".to_string(),
            default_method: "main".to_string(),
            aliases: HashMap::new(),
            diagnostics: false,
        }
    }

    pub fn default_controller(mut self, name: impl Into<String>) -> Self {
        self.default_controller = name.into();
        self
    }

    pub fn default_method(mut self, name: impl Into<String>) -> Self {
        self.default_method = name.into();
        self
    }

    /// Route the path segment `alias` to the controller named `controller`.
    pub fn alias(mut self, alias: &str, controller: impl Into<String>) -> Self {
        self.aliases
            .insert(alias.to_ascii_lowercase(), controller.into());
        self
    }

    /// Render server errors as an HTML diagnostic page.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn register<C: ControllerType>(mut self) -> Self {
        self.registry.register::<C>(&self.container);
        self
    }

    pub fn build(self) -> Dispatcher {
        let default_name = canonical_name(&self.aliases, &self.default_controller);
        let default_methods = self
            .registry
            .find(Namespace::App, &default_name)
            .map(|entry| entry.methods.to_vec())
            .unwrap_or_default();

        Dispatcher {
            resolver: UriResolver::new(self.default_controller, default_methods),
            container: self.container,
            registry: self.registry,
            default_method: self.default_method,
            aliases: self.aliases,
            renderer: ErrorRenderer::new(self.diagnostics),
        }
    }
}

/// Resolves each request to a controller method and runs it.
pub struct Dispatcher {
    container: Container,
    registry: ControllerRegistry,
    resolver: UriResolver,
    default_method: String,
    aliases: HashMap<String, String>,
    renderer: ErrorRenderer,
}

impl Dispatcher {
    pub fn builder(container: Container) -> DispatcherBuilder {
        DispatcherBuilder::new(container)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &UriResolver {
        &self.resolver
    }

    /// Dispatch and render any error. Every request is logged.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let start = Instant::now();
        let method = request.method.clone();
        let uri = request.uri.clone();

        let response = match self.try_dispatch(request.clone()).await {
            Ok(response) => response,
            Err(err) => self.renderer.render(&err, &request),
        };

        girder_log::request(&method, &uri, response.status, start.elapsed());
        response
    }

    pub async fn try_dispatch(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        let mut query = HashMap::new();
        let resolved = self.resolver.resolve(&request.uri, &mut query);
        request.query_params.extend(query);
        let target = resolved?;

        let name = canonical_name(&self.aliases, &target.controller_name);
        let entry = self.registry.find(target.namespace, &name).ok_or_else(|| {
            Error::ControllerNotFound(format!("{}::{}", target.namespace, name))
        })?;

        let controller: Arc<dyn Controller> = self.container.get(&entry.key)?;
        let (method, args) = self.select_method(entry, controller.as_ref(), &request, &target)?;

        trace!("Invoking {}::{} with {:?}", entry.key, method, args);
        controller
            .invoke(
                method,
                Invocation {
                    request,
                    target,
                    args,
                },
            )
            .await
    }

    fn select_method(
        &self,
        entry: &ControllerEntry,
        controller: &dyn Controller,
        request: &HttpRequest,
        target: &RoutingTarget,
    ) -> Result<(&'static str, Vec<String>), Error> {
        let missing = |method: &str| Error::MethodNotFound {
            controller: entry.key.clone(),
            method: method.to_string(),
        };

        if let Some((_, method)) = entry
            .routes
            .iter()
            .find(|(path, _)| *path == target.original_path)
        {
            return entry
                .method(method)
                .map(|m| (m, Vec::new()))
                .ok_or_else(|| missing(method));
        }

        if let Some((first, rest)) = target.path_components.split_first() {
            if let Some(method) = entry.method(first) {
                return Ok((method, rest.to_vec()));
            }
        }

        let fallback = controller
            .default_method(request)
            .unwrap_or(self.default_method.as_str());
        entry
            .method(fallback)
            .map(|m| (m, target.path_components.clone()))
            .ok_or_else(|| missing(fallback))
    }
}

/// Alias table first, then the segment with its first letter upper-cased.
fn canonical_name(aliases: &HashMap<String, String>, raw: &str) -> String {
    if let Some(name) = aliases.get(&raw.to_ascii_lowercase()) {
        return name.clone();
    }
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        let mut aliases = HashMap::new();
        aliases.insert("demo".to_string(), "ModelDemo".to_string());

        assert_eq!(canonical_name(&aliases, "home"), "Home");
        assert_eq!(canonical_name(&aliases, "Demo"), "ModelDemo");
        assert_eq!(canonical_name(&aliases, ""), "");
    }
}
