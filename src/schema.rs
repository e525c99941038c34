use serde::de::DeserializeOwned;

use crate::error::AppError;

// Request body for creating a new Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateTodoSchema {
    pub text: String,
}

// Request body for updating a Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdateTodoSchema {
    pub text: String,
}

// Request body for signup, login and credential lookup
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CredentialsSchema {
    pub uname: String,
    pub pass: String,
}

/// Checks that a decoded body carries everything the handler needs.
pub trait Validate: DeserializeOwned {
    fn validate(self) -> Result<Self, AppError>;

    /// Decodes and validates a raw request body. The Content-Type header is
    /// not consulted. Bad JSON, a missing field or a mistyped field all become
    /// the same fixed validation error.
    fn from_json(body: &[u8]) -> Result<Self, AppError> {
        match serde_json::from_slice::<Self>(body) {
            Ok(body) => body.validate(),
            Err(e) => {
                tracing::debug!("rejected request body: {e}");
                Err(Self::rejected())
            }
        }
    }

    fn rejected() -> AppError;
}

impl Validate for CreateTodoSchema {
    fn validate(self) -> Result<Self, AppError> {
        if self.text.is_empty() {
            return Err(Self::rejected());
        }
        Ok(self)
    }

    fn rejected() -> AppError {
        AppError::InvalidTodoBody
    }
}

impl Validate for UpdateTodoSchema {
    fn validate(self) -> Result<Self, AppError> {
        if self.text.is_empty() {
            return Err(Self::rejected());
        }
        Ok(self)
    }

    fn rejected() -> AppError {
        AppError::InvalidTodoBody
    }
}

impl Validate for CredentialsSchema {
    fn validate(self) -> Result<Self, AppError> {
        if self.uname.is_empty() || self.pass.is_empty() {
            return Err(Self::rejected());
        }
        Ok(self)
    }

    fn rejected() -> AppError {
        AppError::InvalidUserBody
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: Validate>(raw: &str) -> Result<T, AppError> {
        T::from_json(raw.as_bytes())
    }

    #[test]
    fn todo_body_ignores_extra_fields() {
        let body: CreateTodoSchema =
            parse(r#"{"text": "Hello World", "something": "else"}"#).unwrap();
        assert_eq!(body.text, "Hello World");
    }

    #[test]
    fn todo_body_requires_text() {
        for raw in [
            r#"{"invalid": "request-body"}"#,
            r#"{"text": null}"#,
            r#"{"text": ""}"#,
            r#"{"text": 42}"#,
            "not json",
            "",
        ] {
            let err = parse::<CreateTodoSchema>(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidTodoBody), "accepted {raw}");
        }
    }

    #[test]
    fn credentials_require_both_fields() {
        let err = parse::<CredentialsSchema>(r#"{"pass": "badshah"}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidUserBody));

        let err = parse::<CredentialsSchema>(r#"{"uname": "", "pass": "badshah"}"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidUserBody));

        let body: CredentialsSchema = parse(r#"{"uname": "adnan", "pass": "badshah"}"#).unwrap();
        assert_eq!(body.uname, "adnan");
    }
}
