// CRUD, search and statistics over the `samples` table

use crate::services::{SampleChanges, SampleStore};
use girder_core::{
    Container, Controller, ControllerType, Error, HttpRequest, HttpResponse, Injectable,
    Invocation, Namespace, async_trait, rest_method,
};
use girder_log::error;
use girder_seaorm::{SeaOrmError, SeaOrmResult};
use girder_validation::{
    IsEmail, MaxLength, NotEmpty, ValidationBuilder, ValidationError, ValidationErrors,
    ValidationRules,
};
use serde_json::{Map, Value, json};

const MAX_NAME: usize = 255;
const MAX_EMAIL: usize = 255;
const MAX_DESCRIPTION: usize = 1000;

pub struct Sample {
    store: SampleStore,
}

impl Injectable for Sample {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            store: container.resolve()?,
        })
    }
}

/// Field rules. On create `name` and `email` must be present; on update
/// only the supplied fields are checked.
fn rules(update: bool) -> ValidationBuilder {
    let name = ValidationRules::for_field("name")
        .add(NotEmpty::validate)
        .add(|v, f| MaxLength(MAX_NAME).validate(v, f));
    let email = ValidationRules::for_field("email")
        .add(NotEmpty::validate)
        .add(IsEmail::validate)
        .add(|v, f| MaxLength(MAX_EMAIL).validate(v, f));
    let description = ValidationRules::for_field("description")
        .add(|v, f| MaxLength(MAX_DESCRIPTION).validate(v, f));

    let (name, email) = if update {
        (name, email)
    } else {
        (name.required(), email.required())
    };

    ValidationBuilder::new()
        .field(name)
        .field(email)
        .field(description)
}

/// A supplied, non-null input value as text.
fn text(input: &Map<String, Value>, key: &str) -> Option<String> {
    match input.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_id(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|raw| raw.parse().ok())
}

fn not_found() -> Result<HttpResponse, Error> {
    HttpResponse::json(404, &json!({ "success": false, "error": "Sample not found" }))
}

fn invalid(errors: ValidationErrors) -> Result<HttpResponse, Error> {
    HttpResponse::json(
        422,
        &json!({
            "success": false,
            "error": "Validation failed",
            "errors": errors.to_field_map(),
        }),
    )
}

fn failure(context: &str, err: SeaOrmError) -> Result<HttpResponse, Error> {
    error!("{}: {}", context, err);
    HttpResponse::json(
        500,
        &json!({ "success": false, "error": context, "message": err.to_string() }),
    )
}

impl Sample {
    /// Field rules plus email uniqueness, ignoring the sample being updated.
    async fn validate(
        &self,
        input: &Map<String, Value>,
        updating: Option<i32>,
    ) -> SeaOrmResult<Result<(), ValidationErrors>> {
        let mut errors = match rules(updating.is_some()).validate(input) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !errors.has_field("email") {
            if let Some(email) = text(input, "email") {
                if self.store.email_taken(&email, updating).await? {
                    errors.add(
                        ValidationError::new("email", "Email already exists")
                            .with_constraint("unique"),
                    );
                }
            }
        }

        Ok(errors.into_result())
    }

    async fn show(&self, id: Option<&str>) -> Result<HttpResponse, Error> {
        let Some(raw) = id else {
            return match self.store.all().await {
                Ok(samples) => HttpResponse::json(200, &samples),
                Err(err) => failure("Failed to retrieve sample(s)", err),
            };
        };
        let Some(id) = parse_id(Some(raw)) else {
            return not_found();
        };

        match self.store.find(id).await {
            Ok(Some(sample)) => HttpResponse::json(200, &json!({ "success": true, "data": sample })),
            Ok(None) => not_found(),
            Err(err) => failure("Failed to retrieve sample(s)", err),
        }
    }

    async fn create(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let input = request.input();

        let created = async {
            if let Err(errors) = self.validate(&input, None).await? {
                return Ok(Err(errors));
            }
            let sample = self
                .store
                .create(
                    text(&input, "name").unwrap_or_default(),
                    text(&input, "email").unwrap_or_default(),
                    text(&input, "description"),
                )
                .await?;
            Ok::<_, SeaOrmError>(Ok(sample))
        }
        .await;

        match created {
            Ok(Ok(sample)) => HttpResponse::json(201, &sample),
            Ok(Err(errors)) => invalid(errors),
            Err(err) => failure("Failed to create sample", err),
        }
    }

    async fn update(&self, id: Option<&str>, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let Some(id) = parse_id(id) else {
            return not_found();
        };
        let input = request.input();

        let updated = async {
            let Some(existing) = self.store.find(id).await? else {
                return Ok(None);
            };
            if let Err(errors) = self.validate(&input, Some(id)).await? {
                return Ok(Some(Err(errors)));
            }
            let changes = SampleChanges {
                name: text(&input, "name"),
                email: text(&input, "email"),
                description: text(&input, "description"),
            };
            let sample = self.store.update(existing, changes).await?;
            Ok::<_, SeaOrmError>(Some(Ok(sample)))
        }
        .await;

        match updated {
            Ok(Some(Ok(sample))) => HttpResponse::json(
                200,
                &json!({
                    "success": true,
                    "message": "Sample updated successfully",
                    "data": sample,
                }),
            ),
            Ok(Some(Err(errors))) => invalid(errors),
            Ok(None) => not_found(),
            Err(err) => failure("Failed to update sample", err),
        }
    }

    async fn delete(&self, id: Option<&str>) -> Result<HttpResponse, Error> {
        let Some(id) = parse_id(id) else {
            return not_found();
        };

        match self.store.delete(id).await {
            Ok(true) => HttpResponse::json(
                200,
                &json!({ "success": true, "message": "Sample deleted successfully" }),
            ),
            Ok(false) => not_found(),
            Err(err) => failure("Failed to delete sample", err),
        }
    }

    async fn search(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let query = request
            .input_str("q")
            .map(|q| q.trim().to_string())
            .unwrap_or_default();
        if query.is_empty() {
            return HttpResponse::json(
                400,
                &json!({ "success": false, "error": "Search query is required" }),
            );
        }

        match self.store.search(&query).await {
            Ok(samples) => HttpResponse::json(
                200,
                &json!({
                    "success": true,
                    "count": samples.len(),
                    "data": samples,
                    "query": query,
                }),
            ),
            Err(err) => failure("Search failed", err),
        }
    }

    async fn stats(&self) -> Result<HttpResponse, Error> {
        match self.store.stats().await {
            Ok(stats) => HttpResponse::json(200, &json!({ "success": true, "data": stats })),
            Err(err) => failure("Failed to retrieve statistics", err),
        }
    }
}

#[async_trait]
impl Controller for Sample {
    fn default_method(&self, request: &HttpRequest) -> Option<&'static str> {
        rest_method(request)
    }

    async fn invoke(&self, method: &str, call: Invocation) -> Result<HttpResponse, Error> {
        match method {
            "show" => self.show(call.arg(0)).await,
            "create" => self.create(&call.request).await,
            "update" => self.update(call.arg(0), &call.request).await,
            "delete" => self.delete(call.arg(0)).await,
            "search" => self.search(&call.request).await,
            "stats" => self.stats().await,
            other => Err(Error::MethodNotFound {
                controller: Self::key(),
                method: other.to_string(),
            }),
        }
    }
}

impl ControllerType for Sample {
    const NAMESPACE: Namespace = Namespace::Api;
    const NAME: &'static str = "Sample";
    const METHODS: &'static [&'static str] =
        &["show", "create", "update", "delete", "search", "stats"];
    const ROUTES: &'static [(&'static str, &'static str)] = &[
        ("/api/sample/search", "search"),
        ("/api/sample/stats", "stats"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_create_rules() {
        let errors = rules(false)
            .validate(&object(json!({"name": "", "email": "bad"})))
            .unwrap_err()
            .to_field_map();
        assert_eq!(errors["name"], "Name is required");
        assert_eq!(errors["email"], "Invalid email format");

        let errors = rules(false).validate(&object(json!({}))).unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("email"));
    }

    #[test]
    fn test_update_rules_check_supplied_fields_only() {
        assert!(rules(true).validate(&object(json!({"description": "x"}))).is_ok());
        let errors = rules(true)
            .validate(&object(json!({"description": "d".repeat(MAX_DESCRIPTION + 1)})))
            .unwrap_err()
            .to_field_map();
        assert_eq!(
            errors["description"],
            "Description must not exceed 1000 characters"
        );
    }

    #[test]
    fn test_length_limits() {
        let errors = rules(false)
            .validate(&object(json!({
                "name": "n".repeat(MAX_NAME + 1),
                "email": format!("{}@example.com", "e".repeat(MAX_EMAIL)),
            })))
            .unwrap_err()
            .to_field_map();
        assert_eq!(errors["name"], "Name must not exceed 255 characters");
        assert_eq!(errors["email"], "Email must not exceed 255 characters");
    }
}
