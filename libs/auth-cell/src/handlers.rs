use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Json, State},
    http::{HeaderMap, Request, StatusCode},
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use security_cell::validate_user_data;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::{bearer_token, extract_user};
use shared_utils::jwt::validate_token as decode_token;

use crate::models::{SignInRequest, SignUpMetadata};

pub async fn sign_up(
    State(config): State<Arc<AppConfig>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_user_data(&payload)?;

    // Both are present strings once validation passed.
    let email = payload["email"].as_str().unwrap_or_default();
    let password = payload["password"].as_str().unwrap_or_default();
    debug!("Signing up {}", email);

    let client = SupabaseClient::new(&config);
    let user = client
        .sign_up(email, password, SignUpMetadata::from_payload(&payload).to_value())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    info!("New account registered for {}", email);
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn sign_in(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Value>, AppError> {
    let (email, password) = request
        .credentials()
        .ok_or_else(|| AppError::BadRequest("Email and password are required".to_string()))?;

    let client = SupabaseClient::new(&config);
    let session = client.sign_in_with_password(email, password).await.map_err(|e| {
        warn!("Sign-in failed for {}: {}", email, e);
        AppError::Auth("Invalid email or password".to_string())
    })?;

    Ok(Json(session))
}

pub async fn sign_out(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let client = SupabaseClient::new(&config);
    client
        .sign_out(bearer.token())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({ "message": "Signed out successfully" })))
}

pub async fn current_user(request: Request<Body>) -> Result<Json<Value>, AppError> {
    let user = extract_user(&request)
        .map_err(|_| AppError::NotFound("No user is currently signed in.".to_string()))?;

    debug!("Current user requested: {}", user.id);
    Ok(Json(json!({ "user": user })))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let user = decode_token(token, &config.supabase_jwt_secret)
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let valid = decode_token(token, &config.supabase_jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}
