// Validation rules builder

use crate::{ValidationError, ValidationErrors};
use serde_json::{Map, Value};
use std::sync::Arc;

type ValidatorFn = Arc<dyn Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync>;

/// Ordered checks for one field. The first failing check is the field's error.
#[derive(Clone)]
pub struct ValidationRules {
    validators: Vec<ValidatorFn>,
    field: String,
    required: bool,
}

impl ValidationRules {
    /// Create new validation rules for a field
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            validators: Vec::new(),
            field: field.into(),
            required: false,
        }
    }

    /// Treat an absent field as blank instead of skipping it.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        for validator in &self.validators {
            validator(value, &self.field)?;
        }
        Ok(())
    }
}

/// Rules for several fields applied to a JSON object.
#[derive(Clone, Default)]
pub struct ValidationBuilder {
    rules: Vec<ValidationRules>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rules: ValidationRules) -> Self {
        self.rules.push(rules);
        self
    }

    /// Run every field's rules against `data`.
    ///
    /// Absent and `null` fields are skipped unless marked required. Numbers
    /// and booleans are checked in their JSON text form.
    pub fn validate(&self, data: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for rule in &self.rules {
            let value = match data.get(rule.field()) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None if !rule.required => continue,
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            if let Err(error) = rule.validate(&value) {
                errors.add(error);
            }
        }

        errors.into_result()
    }
}
