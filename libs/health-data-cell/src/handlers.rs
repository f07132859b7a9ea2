use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::bearer_token;

use crate::models::{DateRangeQuery, UpdateHealthRecordRequest};
use crate::services::health_data::HealthDataService;

#[derive(Clone)]
pub struct HealthDataState {
    pub service: Arc<HealthDataService>,
}

fn success(data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub async fn create_health_data(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let token = bearer_token(&headers)?;
    let record = state.service.create_record(&user, &payload, token).await?;
    Ok((StatusCode::CREATED, success(record)))
}

pub async fn get_user_health_data(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let records = state.service.list_records(&user, &user_id, token).await?;
    Ok(success(records))
}

pub async fn get_health_data_in_range(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<String>,
    Query(range): Query<DateRangeQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let records = state.service
        .records_in_range(&user, &user_id, range.start, range.end, token)
        .await?;
    Ok(success(records))
}

pub async fn get_health_metrics(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let metrics = state.service.metrics(&user, &user_id, token).await?;
    Ok(success(metrics))
}

pub async fn get_health_trends(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let trends = state.service.trends(&user, &user_id, token).await?;
    Ok(success(trends))
}

pub async fn get_health_data_by_id(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let record = state.service.get_record(&user, &record_id, token).await?;
    Ok(success(record))
}

pub async fn update_health_data(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<UpdateHealthRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let record = state.service.update_record(&user, &record_id, update, token).await?;
    Ok(success(record))
}

pub async fn delete_health_data(
    State(state): State<HealthDataState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    state.service.delete_record(&user, &record_id, token).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Health data record deleted successfully"
    })))
}
