//! REST controllers under `/api`. A path without a method name dispatches
//! on the HTTP verb.

pub mod health;
pub mod posts;
pub mod sample;
