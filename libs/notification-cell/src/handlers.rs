use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ListQuery, NewNotification};
use crate::services::format::sort_notifications;
use crate::services::hub::NotificationHub;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Notification {} not found", id))
}

pub async fn list_notifications(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let store = hub.store_for(&user.id).await;
    let mut notifications = sort_notifications(store.get_stored_notifications().await?);
    if query.unread_only {
        notifications.retain(|n| !n.is_read);
    }

    Ok(Json(json!({ "success": true, "data": notifications })))
}

pub async fn add_notification(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
    Json(notification): Json<NewNotification>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = hub.store_for(&user.id).await;
    let added = store.add_notification(notification).await?;

    info!("Notification {} added for user {}", added.id, user.id);
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": added }))))
}

pub async fn get_notification(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = hub.store_for(&user.id).await;
    let notification = store.get(&id).await?.ok_or_else(|| not_found(&id))?;

    Ok(Json(json!({ "success": true, "data": notification })))
}

pub async fn mark_as_read(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = hub.store_for(&user.id).await;
    let notification = store.mark_as_read(&id).await?.ok_or_else(|| not_found(&id))?;

    Ok(Json(json!({ "success": true, "data": notification })))
}

pub async fn mark_all_as_read(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    hub.store_for(&user.id).await.mark_all_as_read().await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_notification(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let removed = hub.store_for(&user.id).await.remove_notification(&id).await?;
    if !removed {
        return Err(not_found(&id));
    }

    Ok(Json(json!({ "success": true, "message": "Notification deleted" })))
}

pub async fn clear_notifications(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AppError> {
    hub.store_for(&user.id).await.clear_all_notifications().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn notification_analytics(
    State(hub): State<Arc<NotificationHub>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let analytics = hub.store_for(&user.id).await.analytics().await?;
    Ok(Json(json!({ "success": true, "data": analytics })))
}
