//! Input validation for girder controllers.
//!
//! Validators are plain functions of `(value, field)` returning a
//! [`ValidationError`]; [`ValidationRules`] chains them for one field and
//! [`ValidationBuilder`] applies a set of rules to a JSON object, yielding
//! [`ValidationErrors`] that controllers turn into a `{field: message}` map.
//!
//! ```
//! use girder_validation::{IsEmail, MaxLength, NotEmpty, ValidationBuilder, ValidationRules};
//! use serde_json::json;
//!
//! let rules = ValidationBuilder::new()
//!     .field(ValidationRules::for_field("name").required().add(NotEmpty::validate))
//!     .field(
//!         ValidationRules::for_field("email")
//!             .add(IsEmail::validate)
//!             .add(|v, f| MaxLength(255).validate(v, f)),
//!     );
//!
//! let input = json!({"name": "", "email": "bad"});
//! let errors = rules.validate(input.as_object().unwrap()).unwrap_err();
//! assert_eq!(errors.to_field_map()["name"], "Name is required");
//! ```

mod errors;
mod rules;
mod traits;
mod validators;

pub use errors::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
