mod config;
mod errors;
mod llm_client;
mod routes;
mod search;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::{MarkerDetectionPolicy, QueryOrchestrator};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed tunables)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Boolean Search API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    if config.anthropic_api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; generation requests will fail with missing-credential");
    }
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = config.search.clone();
    info!(
        "Query limits: {} words, {} requests per {}ms, cache TTL {}ms",
        settings.max_query_words,
        settings.rate_limit_max_requests,
        settings.rate_limit_window_ms,
        settings.cache_ttl_ms
    );

    // Detection policy is swappable per locale; markers cover Dutch and English postings
    let orchestrator = QueryOrchestrator::new(
        settings,
        Arc::new(llm),
        Arc::new(MarkerDetectionPolicy::default()),
    );

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the UI origin once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
