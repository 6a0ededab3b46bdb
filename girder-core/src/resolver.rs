// Request-target resolution: path segments to a controller and its components

use crate::Error;
use girder_log::trace;
use std::collections::HashMap;
use std::fmt;

/// Which controller family a request is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    App,
    Api,
}

impl Namespace {
    /// Module path prefix used for container keys.
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::App => "controllers",
            Namespace::Api => "controllers::api",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Result of resolving one request target. Consumed once by dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTarget {
    pub namespace: Namespace,
    /// Raw controller segment, not yet canonicalized.
    pub controller_name: String,
    pub path_components: Vec<String>,
    /// Path with `index.php` removed and the query string dropped.
    pub original_path: String,
}

/// Maps a raw request target onto a [`RoutingTarget`].
#[derive(Debug, Clone)]
pub struct UriResolver {
    default_controller: String,
    default_methods: Vec<String>,
}

impl UriResolver {
    /// `default_methods` are the public method names of the default
    /// controller, which may be addressed directly from the root (`/main`).
    pub fn new<I, S>(default_controller: impl Into<String>, default_methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_controller: default_controller.into(),
            default_methods: default_methods.into_iter().map(Into::into).collect(),
        }
    }

    pub fn default_controller(&self) -> &str {
        &self.default_controller
    }

    /// Resolve `target` and fill `query` from its query string.
    ///
    /// The query string is decoded before the path is looked at, so `query`
    /// is populated even when the path turns out to be invalid.
    pub fn resolve(
        &self,
        target: &str,
        query: &mut HashMap<String, String>,
    ) -> Result<RoutingTarget, Error> {
        let (path, query_string) = split_target(target);

        if let Some(qs) = query_string {
            query.extend(parse_query(qs));
        }

        let stripped = path.replace("/index.php", "").replace("index.php", "");
        let original_path = if stripped.is_empty() {
            "/".to_string()
        } else {
            stripped
        };

        let segments: Vec<&str> = original_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let routing = match segments.split_first() {
            None => RoutingTarget {
                namespace: Namespace::App,
                controller_name: self.default_controller.clone(),
                path_components: Vec::new(),
                original_path,
            },
            Some((&"api", rest)) => {
                let (controller, components) = rest
                    .split_first()
                    .ok_or_else(|| Error::InvalidRoute(format!("{} names no controller", target)))?;
                RoutingTarget {
                    namespace: Namespace::Api,
                    controller_name: controller.to_string(),
                    path_components: to_owned(components),
                    original_path,
                }
            }
            Some((first, _)) if self.is_default_method(first) => RoutingTarget {
                namespace: Namespace::App,
                controller_name: self.default_controller.clone(),
                path_components: to_owned(&segments),
                original_path,
            },
            Some((first, rest)) => RoutingTarget {
                namespace: Namespace::App,
                controller_name: first.to_string(),
                path_components: to_owned(rest),
                original_path,
            },
        };

        trace!(
            "Resolved {} to {}::{} {:?}",
            target, routing.namespace, routing.controller_name, routing.path_components
        );

        Ok(routing)
    }

    fn is_default_method(&self, segment: &str) -> bool {
        self.default_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(segment))
    }
}

/// Path and query string of an origin-form (`/path?q`) or absolute-form
/// (`http://host/path?q`) target. Only the path part can carry a scheme.
fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = target.split_once('#').map(|(t, _)| t).unwrap_or(target);
    let (path, query) = match target.split_once('?') {
        Some((path, qs)) => (path, Some(qs)),
        None => (target, None),
    };

    let path = match path.find("://") {
        Some(idx) if !path.starts_with('/') => {
            let after = &path[idx + 3..];
            after.find('/').map(|i| &after[i..]).unwrap_or("")
        }
        _ => path,
    };
    (path, query)
}

/// Decode a query string; the last value for a repeated key wins.
fn parse_query(qs: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(qs)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

fn to_owned(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}
