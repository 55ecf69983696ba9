pub mod case_json;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{config::Config, middleware::cors::cors_layer, AppState};

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

fn case_route() -> MethodRouter<AppState> {
    post(case_json::case_json).fallback(case_json::method_not_allowed)
}

pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/case-json", case_route())
        .route("/case-json", case_route())
        .with_state(state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
