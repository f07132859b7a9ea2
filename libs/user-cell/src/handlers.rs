use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;

use crate::models::ProfileRequest;
use crate::services::profile::UserProfileService;

pub async fn upsert_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let request = ProfileRequest::from_payload(&payload)?;

    let profile = UserProfileService::new(&state).upsert_profile(&user, request, token).await?;
    Ok(Json(json!(profile)))
}

pub async fn list_profiles(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let profiles = UserProfileService::new(&state).list_profiles(token).await?;
    Ok(Json(json!(profiles)))
}

pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let profile = UserProfileService::new(&state).get_profile(&id, token).await?;
    Ok(Json(json!(profile)))
}

pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let request = ProfileRequest::from_payload(&payload)?;

    let profile = UserProfileService::new(&state)
        .update_profile(&user, &id, request, token)
        .await?;
    Ok(Json(json!(profile)))
}

pub async fn delete_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    UserProfileService::new(&state).delete_profile(&user, &id, token).await?;
    Ok(Json(json!({ "success": true })))
}
