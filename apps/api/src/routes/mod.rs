pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Analysis API
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/analyze/text", post(handlers::handle_analyze_text))
        .route("/api/analyses/:id", get(handlers::handle_get_analysis))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
