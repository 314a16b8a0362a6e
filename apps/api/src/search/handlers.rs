//! Axum route handlers for the Search API.

use std::future::Future;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::search::links::{search_links, SearchLink};
use crate::search::models::{
    CompanyXray, ErrorKind, ErrorResult, GeneratedResult, Platform, RefinedQuery, SearchMode,
    SearchRequest,
};
use crate::state::AppState;

const ANONYMOUS_IDENTITY: &str = "anonymous";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateQueryRequest {
    pub input: String,
    pub platform: Platform,
    pub mode: SearchMode,
    /// Rate-limit bucket. Falls back to the forwarded client address.
    pub identity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefineQueryRequest {
    pub query: String,
    pub platform: Platform,
}

#[derive(Debug, Deserialize)]
pub struct CompanyXrayRequest {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchLinksRequest {
    pub query: String,
    pub platform: Platform,
}

#[derive(Debug, Serialize)]
pub struct SearchLinksResponse {
    pub links: Vec<SearchLink>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/search/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GenerateQueryRequest>,
) -> Result<Json<GeneratedResult>, AppError> {
    let identity = body
        .identity
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| identity_from_headers(&headers));

    let request = SearchRequest {
        raw_input: body.input,
        platform: body.platform,
        mode: body.mode,
        identity,
    };

    let orchestrator = state.orchestrator.clone();
    let result = isolate(async move { orchestrator.generate(&request).await }).await?;
    Ok(Json(result))
}

/// POST /api/v1/search/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(body): Json<RefineQueryRequest>,
) -> Result<Json<RefinedQuery>, AppError> {
    let orchestrator = state.orchestrator.clone();
    let result =
        isolate(async move { orchestrator.refine(&body.query, body.platform).await }).await?;
    Ok(Json(result))
}

/// POST /api/v1/search/company-xray
pub async fn handle_company_xray(
    State(state): State<AppState>,
    Json(body): Json<CompanyXrayRequest>,
) -> Result<Json<CompanyXray>, AppError> {
    let orchestrator = state.orchestrator.clone();
    let result = isolate(async move { orchestrator.company_xray(&body.domain).await }).await?;
    Ok(Json(result))
}

/// POST /api/v1/search/links
pub async fn handle_links(
    Json(body): Json<SearchLinksRequest>,
) -> Result<Json<SearchLinksResponse>, AppError> {
    if body.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    Ok(Json(SearchLinksResponse {
        links: search_links(body.platform, &body.query),
    }))
}

/// Runs a pipeline call on its own task so a panic surfaces as an `unknown` error
/// instead of tearing down the connection.
async fn isolate<T, F>(pipeline: F) -> Result<T, ErrorResult>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ErrorResult>> + Send + 'static,
{
    match tokio::spawn(pipeline).await {
        Ok(result) => result,
        Err(join_error) => {
            tracing::error!("Pipeline task failed: {join_error}");
            Err(ErrorResult::new(
                ErrorKind::Unknown,
                "An unexpected error occurred while generating the query",
            ))
        }
    }
}

fn identity_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ANONYMOUS_IDENTITY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_uses_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(identity_from_headers(&headers), "203.0.113.7");
    }

    #[test]
    fn test_identity_falls_back_to_anonymous() {
        assert_eq!(identity_from_headers(&HeaderMap::new()), ANONYMOUS_IDENTITY);
    }

    #[tokio::test]
    async fn test_isolate_turns_panic_into_unknown_error() {
        let explode = true;
        let result: Result<(), ErrorResult> = isolate(async move {
            if explode {
                panic!("boom");
            }
            Ok(())
        })
        .await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_generate_request_identity_is_optional() {
        let body: GenerateQueryRequest = serde_json::from_value(serde_json::json!({
            "input": "Senior Java developer",
            "platform": "linkedin",
            "mode": "native"
        }))
        .unwrap();
        assert!(body.identity.is_none());
        assert_eq!(body.mode, SearchMode::Native);
    }
}
