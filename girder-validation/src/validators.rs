// Built-in validators

use crate::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

// Dotted domain required: `user@localhost` is rejected.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("email pattern compiles")
});

/// `email` -> `Email`, used to start messages.
pub fn label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validates that a string is not blank
pub struct NotEmpty;

impl NotEmpty {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(
                ValidationError::new(field, format!("{} is required", label(field)))
                    .with_constraint("notEmpty"),
            )
        } else {
            Ok(())
        }
    }
}

/// Validates maximum string length in characters
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if value.chars().count() > self.0 {
            Err(ValidationError::new(
                field,
                format!("{} must not exceed {} characters", label(field), self.0),
            )
            .with_constraint("maxLength"))
        } else {
            Ok(())
        }
    }
}

/// Validates email format
pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if EMAIL_REGEX.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(field, "Invalid email format").with_constraint("isEmail"))
        }
    }

    pub fn is_valid(value: &str) -> bool {
        EMAIL_REGEX.is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(NotEmpty::validate("hello", "name").is_ok());
        let err = NotEmpty::validate("   ", "name").unwrap_err();
        assert_eq!(err.message, "Name is required");
        assert_eq!(err.constraint, "notEmpty");
    }

    #[test]
    fn test_max_length_counts_chars() {
        assert!(MaxLength(3).validate("héé", "name").is_ok());
        let err = MaxLength(3).validate("abcd", "description").unwrap_err();
        assert_eq!(err.message, "Description must not exceed 3 characters");
    }

    #[test]
    fn test_email() {
        assert!(IsEmail::validate("john@example.com", "email").is_ok());
        assert!(IsEmail::validate("first.last+tag@mail.example.org", "email").is_ok());
        assert!(IsEmail::validate("bad", "email").is_err());
        assert!(IsEmail::validate("user@localhost", "email").is_err());
        assert!(IsEmail::validate("@example.com", "email").is_err());
        assert_eq!(
            IsEmail::validate("nope", "email").unwrap_err().message,
            "Invalid email format"
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(label("email"), "Email");
        assert_eq!(label(""), "");
    }
}
