use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::models::{ErrorKind, ErrorResult};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ErrorResult> for AppError {
    fn from(err: ErrorResult) -> Self {
        match err.kind {
            ErrorKind::Validation => AppError::Validation(err.message),
            ErrorKind::MissingCredential => AppError::MissingCredential(err.message),
            ErrorKind::RateLimited => AppError::RateLimited(err.message),
            ErrorKind::Upstream => AppError::Upstream(err.message),
            ErrorKind::Unknown => AppError::Unknown(err.message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, kind, message) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                ErrorKind::Validation,
                msg.clone(),
            ),
            AppError::MissingCredential(msg) => {
                tracing::error!("Model credential missing: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MISSING_CREDENTIAL",
                    ErrorKind::MissingCredential,
                    msg.clone(),
                )
            }
            AppError::RateLimited(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                ErrorKind::RateLimited,
                msg.clone(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    ErrorKind::Upstream,
                    msg.clone(),
                )
            }
            AppError::Unknown(msg) => {
                tracing::error!("Unknown error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNKNOWN_ERROR",
                    ErrorKind::Unknown,
                    msg.clone(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "kind": kind,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
