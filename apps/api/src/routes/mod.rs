pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/categories", get(handlers::handle_list_categories))
        .route("/api/interview", post(handlers::handle_interview))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
