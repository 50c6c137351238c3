//! v1 API endpoints

pub mod knowledge;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/knowledge/search", post(knowledge::search_knowledge))
        .route("/knowledge/case-studies", post(knowledge::search_case_studies))
        .route("/knowledge/creator", post(knowledge::search_creator_content))
        .route("/knowledge/context", post(knowledge::search_with_context))
        .route("/knowledge/diagnostics", get(knowledge::diagnostics))
}
