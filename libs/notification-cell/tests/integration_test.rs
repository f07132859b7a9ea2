use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use notification_cell::services::sink::FileKeyValueStore;
use notification_cell::{notification_routes, KeyValueStore, NotificationHub};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

struct TestApp {
    router: Router,
    token: String,
}

impl TestApp {
    fn new(sink: Arc<dyn KeyValueStore>, user: &TestUser) -> Self {
        let config = TestConfig::default();
        let token = JwtTestUtils::create_test_token(user, &config.jwt_secret, None);
        let hub = Arc::new(NotificationHub::new(sink));
        Self { router: notification_routes(config.to_arc(), hub), token }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }
}

#[tokio::test]
async fn test_notification_lifecycle_over_file_sink() {
    let dir = TempDir::new().unwrap();
    let user = TestUser::default();
    let app = TestApp::new(Arc::new(FileKeyValueStore::new(dir.path())), &user);

    let (status, created) = app
        .send(
            "POST",
            "/",
            Some(json!({ "title": "Reading due", "message": "Log today's weight", "timestamp": "2024-05-01T08:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["timestamp"], "01/05/2024, 08:00:00");
    assert_eq!(created["data"]["isRead"], false);
    let first_id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, latest) = app
        .send(
            "POST",
            "/",
            Some(json!({ "title": "Trend", "message": "Weight down 1kg", "timestamp": "2024-05-02T08:00:00Z" })),
        )
        .await;

    let (status, list) = app.send("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"][0]["id"], latest["data"]["id"]);

    let (status, read) = app.send("PUT", &format!("/{}/read", first_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["data"]["isRead"], true);

    let (_, unread) = app.send("GET", "/?unread_only=true", None).await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 1);

    let (_, analytics) = app.send("GET", "/analytics", None).await;
    assert_eq!(analytics["data"], json!({ "total": 2, "read": 1, "unread": 1 }));

    let stored = FileKeyValueStore::new(dir.path())
        .get(&NotificationHub::storage_key(&user.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(serde_json::from_str::<Value>(&stored).unwrap().as_array().unwrap().len(), 2);

    let (status, _) = app.send("DELETE", "/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = app.send("GET", "/", None).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::new(Arc::new(FileKeyValueStore::new(dir.path())), &TestUser::default());

    let (status, json) = app.send("POST", "/", Some(json!({ "title": "T", "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Message cannot be empty");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::new(Arc::new(FileKeyValueStore::new(dir.path())), &TestUser::default());

    let (status, _) = app.send("PUT", "/missing/read", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", "/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("PUT", "/read-all", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_requires_token() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::new(Arc::new(FileKeyValueStore::new(dir.path())), &TestUser::default());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
