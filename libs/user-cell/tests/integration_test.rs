use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};
use user_cell::user_routes;

async fn send(config: &TestConfig, token: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token));
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = user_routes(config.to_arc()).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

#[tokio::test]
async fn test_get_profile_by_id() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_profile_response(&user.id)
        ])))
        .mount(&mock_server)
        .await;

    let (status, json) = send(&config, &token, "GET", &format!("/{}", user.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "John Doe");
}

#[tokio::test]
async fn test_invalid_profile_payload_lists_both_fields() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, None);

    let (status, json) = send(&config, &token, "POST", "/", Some(json!({ "email": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["name"], json!(["Name is required"]));
    assert_eq!(json["details"]["email"], json!(["A valid email is required"]));
}

#[tokio::test]
async fn test_delete_other_profile_is_forbidden() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_test_token(&TestUser::default(), &config.jwt_secret, None);

    let (status, _) = send(&config, &token, "DELETE", "/someone-else", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_own_profile() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, None);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_profile_response(&user.id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, json) = send(
        &config,
        &token,
        "PUT",
        &format!("/{}", user.id),
        Some(json!({ "name": "John Doe", "email": "johndoe@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], user.id);
}
