use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use health_data_cell::router::health_data_routes;
use notification_cell::{notification_routes, NotificationHub};
use security_cell::router::create_security_router;
use shared_config::AppConfig;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppConfig>, hub: Arc<NotificationHub>) -> Router {
    Router::new()
        .route("/", get(|| async { "Personal Health Dashboard API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/health-data", health_data_routes(state.clone()))
        .nest("/notifications", notification_routes(state, hub))
        .nest("/security", create_security_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use notification_cell::services::sink::InMemoryKeyValueStore;
    use serde_json::{json, Value};
    use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};
    use tower::ServiceExt;

    fn app(config: &TestConfig) -> Router {
        let hub = Arc::new(NotificationHub::new(Arc::new(InMemoryKeyValueStore::new())));
        create_router(config.to_arc(), hub)
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let response = app(&TestConfig::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_security_routes_are_public() {
        let request = Request::builder()
            .method("POST")
            .uri("/security/password/validate")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "password": "Str0ng#Pass" }).to_string()))
            .unwrap();

        let response = app(&TestConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_notifications_are_nested_and_protected() {
        let config = TestConfig::default();
        let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, None);

        let unauthenticated = app(&config)
            .oneshot(Request::builder().uri("/notifications").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/notifications/analytics")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app(&config).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["total"], 0);
    }
}
