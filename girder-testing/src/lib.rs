//! Testing utilities for girder applications.
//!
//! [`TestClient`] sends requests straight into a
//! [`Dispatcher`](girder_core::Dispatcher), so routing, controller building
//! and error rendering are exercised without binding a port.

mod test_client;

pub use test_client::{TestClient, TestResponse};
