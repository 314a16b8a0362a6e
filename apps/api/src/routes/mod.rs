pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search API
        .route("/api/v1/search/generate", post(handlers::handle_generate))
        .route("/api/v1/search/refine", post(handlers::handle_refine))
        .route(
            "/api/v1/search/company-xray",
            post(handlers::handle_company_xray),
        )
        .route("/api/v1/search/links", post(handlers::handle_links))
        .with_state(state)
}
