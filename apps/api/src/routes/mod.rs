pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::generation::handlers::handle_generate;
use crate::github::handlers::handle_list_repos;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resume/generate", post(handle_generate))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/github/repos", get(handle_list_repos))
        .with_state(state)
}
