use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignInRequest {
    /// Both credentials, when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}

/// Profile fields kept as Supabase user metadata on sign-up.
#[derive(Debug, Serialize)]
pub struct SignUpMetadata {
    pub first_name: Value,
    pub last_name: Value,
    pub phone_number: Value,
}

impl SignUpMetadata {
    pub fn from_payload(payload: &Value) -> Self {
        let field = |name: &str| payload.get(name).cloned().unwrap_or(Value::Null);
        Self {
            first_name: field("firstName"),
            last_name: field("lastName"),
            phone_number: field("phoneNumber"),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "phone_number": self.phone_number,
        })
    }
}
