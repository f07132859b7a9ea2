use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, HealthDataState};
use crate::services::health_data::HealthDataService;
use crate::services::repository::{HealthDataRepository, SupabaseHealthDataRepository};

pub fn health_data_routes(config: Arc<AppConfig>) -> Router {
    let repository = Arc::new(SupabaseHealthDataRepository::new(&config));
    health_data_routes_with(config, repository)
}

/// Same routes over any repository; every route requires a bearer token.
pub fn health_data_routes_with(
    config: Arc<AppConfig>,
    repository: Arc<dyn HealthDataRepository>,
) -> Router {
    let state = HealthDataState {
        service: Arc::new(HealthDataService::new(repository)),
    };

    Router::new()
        .route("/", post(handlers::create_health_data))
        .route("/user/{user_id}", get(handlers::get_user_health_data))
        .route("/user/{user_id}/range", get(handlers::get_health_data_in_range))
        .route("/user/{user_id}/metrics", get(handlers::get_health_metrics))
        .route("/user/{user_id}/trends", get(handlers::get_health_trends))
        .route(
            "/{id}",
            get(handlers::get_health_data_by_id)
                .put(handlers::update_health_data)
                .delete(handlers::delete_health_data),
        )
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
