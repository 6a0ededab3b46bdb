// Validation traits

use crate::ValidationErrors;
use async_trait::async_trait;

/// Trait for validatable types
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Validation that needs I/O, such as uniqueness checks against a database.
#[async_trait]
pub trait AsyncValidate {
    async fn validate_async(&self) -> Result<(), ValidationErrors>;
}
