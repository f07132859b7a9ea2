// =====================================================================================
// SECURITY CELL ROUTER
// =====================================================================================

use axum::{routing::post, Router};
use tower_http::cors::CorsLayer;

use crate::handlers::{generate_password, validate_health, validate_password, validate_user};

/// Stateless routes; nothing here needs configuration or a session.
pub fn create_security_router() -> Router {
    Router::new()
        .route("/password/validate", post(validate_password))
        .route("/password/generate", post(generate_password))
        .route("/validate/user", post(validate_user))
        .route("/validate/health-data", post(validate_health))
        .layer(CorsLayer::permissive())
}
