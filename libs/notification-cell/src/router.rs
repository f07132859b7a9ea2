use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::hub::NotificationHub;

pub fn notification_routes(config: Arc<AppConfig>, hub: Arc<NotificationHub>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_notifications)
                .post(handlers::add_notification)
                .delete(handlers::clear_notifications),
        )
        .route("/analytics", get(handlers::notification_analytics))
        .route("/read-all", put(handlers::mark_all_as_read))
        .route(
            "/{id}",
            get(handlers::get_notification).delete(handlers::delete_notification),
        )
        .route("/{id}/read", put(handlers::mark_as_read))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(hub)
}
