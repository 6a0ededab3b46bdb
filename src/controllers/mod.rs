//! Controllers of the demo application.
//!
//! Keys in the container follow the namespace: `controllers::Home`,
//! `controllers::api::Sample`.

pub mod api;
pub mod health;
pub mod home;
pub mod model_demo;

use girder_core::DispatcherBuilder;

/// Register every controller on `builder`.
pub fn register(builder: DispatcherBuilder) -> DispatcherBuilder {
    builder
        .register::<home::Home>()
        .register::<health::Health>()
        .register::<model_demo::ModelDemo>()
        .register::<api::health::Health>()
        .register::<api::sample::Sample>()
        .register::<api::posts::Posts>()
}
