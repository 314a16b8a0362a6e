use std::sync::Arc;

use crate::search::QueryOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the rate limiter and response cache; one instance per process.
    pub orchestrator: Arc<QueryOrchestrator>,
}
