// Core library for the girder micro-framework
// Front controller, URI resolution, controller dispatch and the DI container

pub mod application;
pub mod container;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod error_page;
pub mod http;
pub mod resolver;

pub use application::Application;
pub use container::{Container, Injectable};
pub use controller::{Controller, ControllerType, Invocation, rest_method};
pub use dispatch::{ControllerEntry, ControllerRegistry, Dispatcher, DispatcherBuilder};
pub use error::Error;
pub use error_page::ErrorRenderer;
pub use http::{HttpRequest, HttpResponse};
pub use resolver::{Namespace, RoutingTarget, UriResolver};

pub use async_trait::async_trait;
