// =====================================================================================
// SECURITY CELL HANDLERS - HTTP ENDPOINTS
// =====================================================================================

use axum::{body::Bytes, Json};
use serde_json::Value;
use tracing::{debug, instrument};

use shared_models::error::{AppError, ValidationError};

use crate::models::{
    AllRulesPolicyResult, GeneratePasswordRequest, GeneratePasswordResponse,
    PasswordValidationRequest, PasswordValidationResponse, StrictPolicyResult,
};
use crate::services::password::{
    generate_strong_password, validate_all_rules, validate_first_violation,
    DEFAULT_GENERATED_LENGTH,
};
use crate::services::validation::{validate_health_data, validate_user_data};

pub const MAX_GENERATED_LENGTH: usize = 128;

// =====================================================================================
// PASSWORD ENDPOINTS
// =====================================================================================

/// Runs both password strategies side by side.
#[instrument(skip(request))]
pub async fn validate_password(
    Json(request): Json<PasswordValidationRequest>,
) -> Result<Json<PasswordValidationResponse>, AppError> {
    let password = request.password.as_str();

    let strict = match validate_first_violation(password) {
        Ok(()) => StrictPolicyResult { valid: true, message: None },
        Err(e) => StrictPolicyResult { valid: false, message: Some(e.to_string()) },
    };

    let all_rules = match password {
        None => AllRulesPolicyResult {
            valid: false,
            violations: vec!["Password must be a string.".to_string()],
        },
        Some(password) => match validate_all_rules(password) {
            Ok(()) => AllRulesPolicyResult { valid: true, violations: Vec::new() },
            Err(ValidationError::Fields(fields)) => AllRulesPolicyResult {
                valid: false,
                violations: fields.get("password").map(<[String]>::to_vec).unwrap_or_default(),
            },
            Err(ValidationError::Rule(message)) => AllRulesPolicyResult {
                valid: false,
                violations: vec![message],
            },
        },
    };

    debug!("Password check: strict={} all_rules={}", strict.valid, all_rules.valid);

    Ok(Json(PasswordValidationResponse {
        requirements_met: strict.valid && all_rules.valid,
        strict,
        all_rules,
    }))
}

#[instrument(skip(body))]
pub async fn generate_password(
    body: Bytes,
) -> Result<Json<GeneratePasswordResponse>, AppError> {
    // An empty body asks for the default length.
    let request: GeneratePasswordRequest = if body.is_empty() {
        GeneratePasswordRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let requested = request.length.unwrap_or(DEFAULT_GENERATED_LENGTH);

    if requested > MAX_GENERATED_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password length cannot exceed {} characters",
            MAX_GENERATED_LENGTH
        )));
    }

    let password = generate_strong_password(requested);
    let length = password.chars().count();

    Ok(Json(GeneratePasswordResponse { password, length }))
}

// =====================================================================================
// ENTITY VALIDATION ENDPOINTS
// =====================================================================================

#[instrument(skip(payload))]
pub async fn validate_user(Json(payload): Json<Value>) -> Result<Json<Value>, AppError> {
    validate_user_data(&payload)?;
    Ok(Json(serde_json::json!({ "valid": true })))
}

#[instrument(skip(payload))]
pub async fn validate_health(Json(payload): Json<Value>) -> Result<Json<Value>, AppError> {
    validate_health_data(&payload)?;
    Ok(Json(serde_json::json!({ "valid": true })))
}
