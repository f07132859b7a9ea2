use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use security_cell::validate_email;
use shared_models::error::{AppError, FieldErrors, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    pub email: String,
}

impl ProfileRequest {
    /// Checks name and email together, reporting both when both are wrong.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut errors = FieldErrors::new();

        let name = payload.get("name").and_then(Value::as_str).filter(|n| !n.trim().is_empty());
        if name.is_none() {
            errors.add("name", "Name is required");
        }

        let email = payload.get("email").and_then(Value::as_str).filter(|e| validate_email(e));
        if email.is_none() {
            errors.add("email", "A valid email is required");
        }

        match (name, email) {
            (Some(name), Some(email)) => Ok(Self {
                name: name.trim().to_string(),
                email: email.to_string(),
            }),
            _ => Err(ValidationError::Fields(errors)),
        }
    }
}

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User profile not found")]
    NotFound,

    #[error("Not authorized to modify another user's profile")]
    Unauthorized,

    #[error("Error {context}: {source}")]
    Database {
        context: &'static str,
        source: anyhow::Error,
    },
}

impl UserError {
    pub fn database(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Database { context, source }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::Unauthorized => AppError::Forbidden(err.to_string()),
            UserError::Database { .. } => AppError::Database(err.to_string()),
        }
    }
}
