use async_trait::async_trait;
use girder_validation::{
    AsyncValidate, IsEmail, MaxLength, NotEmpty, Validate, ValidationError, ValidationErrors,
};
use std::collections::HashSet;

struct Signup {
    name: String,
    email: String,
}

impl Validate for Signup {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = NotEmpty::validate(&self.name, "name")
            .and_then(|_| MaxLength(10).validate(&self.name, "name"))
        {
            errors.add(e);
        }
        if let Err(e) = IsEmail::validate(&self.email, "email") {
            errors.add(e);
        }
        errors.into_result()
    }
}

struct UniqueSignup<'a> {
    signup: Signup,
    taken: &'a HashSet<&'static str>,
}

#[async_trait]
impl AsyncValidate for UniqueSignup<'_> {
    async fn validate_async(&self) -> Result<(), ValidationErrors> {
        self.signup.validate()?;
        if self.taken.contains(self.signup.email.as_str()) {
            return Err(ValidationError::new("email", "Email already exists").into());
        }
        Ok(())
    }
}

#[test]
fn test_sync_validation() {
    let ok = Signup {
        name: "Ada".into(),
        email: "ada@example.com".into(),
    };
    assert!(ok.validate().is_ok());

    let bad = Signup {
        name: "a name that is too long".into(),
        email: "nope".into(),
    };
    let errors = bad.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.to_field_map()["name"],
        "Name must not exceed 10 characters"
    );
}

#[tokio::test]
async fn test_async_uniqueness() {
    let taken: HashSet<&'static str> = ["ada@example.com"].into_iter().collect();

    let duplicate = UniqueSignup {
        signup: Signup {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        },
        taken: &taken,
    };
    let errors = duplicate.validate_async().await.unwrap_err();
    assert_eq!(errors.to_field_map()["email"], "Email already exists");

    let fresh = UniqueSignup {
        signup: Signup {
            name: "Grace".into(),
            email: "grace@example.com".into(),
        },
        taken: &taken,
    };
    assert!(fresh.validate_async().await.is_ok());
}
