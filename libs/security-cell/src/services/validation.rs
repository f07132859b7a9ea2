// =====================================================================================
// VALIDATION SERVICE - FIELD PREDICATES & ENTITY VALIDATORS
// =====================================================================================

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument};

use shared_models::error::{FieldErrors, ValidationError};

use crate::services::password::PasswordPolicy;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?\d{1,3}\s?\d{3}\s?\d{3}\s?\d{4}$").expect("phone pattern compiles")
});

pub const USER_REQUIRED_FIELDS: [&str; 5] = ["firstName", "lastName", "email", "password", "phoneNumber"];

/// (field, label) pairs; the label is what the message shows.
pub const HEALTH_REQUIRED_FIELDS: [(&str, &str); 4] = [
    ("userId", "User ID"),
    ("weight", "Weight"),
    ("height", "Height"),
    ("bloodPressure", "Blood Pressure"),
];

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";
pub const INVALID_PASSWORD_MESSAGE: &str = "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase letter, one number, and one special character";
pub const INVALID_PHONE_MESSAGE: &str = "Invalid phone number";

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Collect-all strength predicate used for registration data.
pub fn validate_password(password: &str) -> bool {
    PasswordPolicy::PROFILE.violations(password).is_empty()
}

pub fn validate_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Absent, null, false, zero, NaN and "" all count as missing.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn missing_fields<'a>(data: &Value, fields: &[&'a str]) -> Vec<&'a str> {
    fields
        .iter()
        .copied()
        .filter(|field| !is_present(data.get(*field)))
        .collect()
}

/// A present value fails its shape check unless it is a string the check accepts.
fn fails_shape(data: &Value, field: &str, check: fn(&str) -> bool) -> bool {
    let value = data.get(field);
    is_present(value) && !value.and_then(Value::as_str).is_some_and(check)
}

/// One `"<field> is required"` message per missing field, in listed order.
pub fn validate_required_fields(data: &Value, fields: &[&str]) -> Vec<String> {
    missing_fields(data, fields)
        .into_iter()
        .map(|field| format!("{} is required", field))
        .collect()
}

/// Registration payload: required pass then shape pass, reported together.
#[instrument(skip(user_data))]
pub fn validate_user_data(user_data: &Value) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::new();

    for field in missing_fields(user_data, &USER_REQUIRED_FIELDS) {
        errors.add(field, format!("{} is required", field));
    }

    if fails_shape(user_data, "email", validate_email) {
        errors.add("email", INVALID_EMAIL_MESSAGE);
    }
    if fails_shape(user_data, "password", validate_password) {
        errors.add("password", INVALID_PASSWORD_MESSAGE);
    }
    if fails_shape(user_data, "phoneNumber", validate_phone_number) {
        errors.add("phoneNumber", INVALID_PHONE_MESSAGE);
    }

    if !errors.is_empty() {
        debug!("User data rejected for fields: {:?}", errors.fields().collect::<Vec<_>>());
    }
    errors.into_result()
}

#[instrument(skip(health_data))]
pub fn validate_health_data(health_data: &Value) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::new();

    for (field, label) in HEALTH_REQUIRED_FIELDS {
        if !is_present(health_data.get(field)) {
            errors.add(field, format!("{} is required", label));
        }
    }

    if !errors.is_empty() {
        debug!("Health data rejected for fields: {:?}", errors.fields().collect::<Vec<_>>());
    }
    errors.into_result()
}
