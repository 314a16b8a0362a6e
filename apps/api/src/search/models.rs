//! Request / result types shared by every stage of the query pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the site restriction that turns a query into an X-ray search.
pub const SITE_MARKER: &str = "site:";

/// Target platform whose profiles the query should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Linkedin,
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
        }
    }

    /// The `site:` filter an X-ray query for this platform starts with.
    pub fn site_filter(&self) -> &'static str {
        match self {
            Platform::Linkedin => "site:linkedin.com/in",
            Platform::Facebook => "site:facebook.com",
        }
    }
}

/// Native = the platform's own search box. Xray = a web search engine with `site:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Native,
    Xray,
}

impl SearchMode {
    /// Guesses the mode an existing query was written for.
    pub fn infer_from_query(query: &str) -> Self {
        if query.contains(SITE_MARKER) {
            SearchMode::Xray
        } else {
            SearchMode::Native
        }
    }
}

/// One user action. Not persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub raw_input: String,
    pub platform: Platform,
    pub mode: SearchMode,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResult {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedQuery {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyXray {
    pub domain: String,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    MissingCredential,
    Upstream,
    RateLimited,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::MissingCredential => "missing-credential",
            ErrorKind::Upstream => "upstream",
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Tagged failure returned at the pipeline boundary. Never formatted for a specific UI.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorResult {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorResult {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn missing_credential() -> Self {
        Self::new(
            ErrorKind::MissingCredential,
            "No API key configured for the language model",
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(
            ErrorKind::RateLimited,
            "Too many requests. Please wait a minute and try again.",
        )
    }

    /// Classifies an unexpected failure by its message. Anything mentioning a rate limit
    /// or an API key gets the specific kind; the rest is an upstream failure.
    pub fn from_failure_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if message.to_lowercase().contains("rate limit") {
            ErrorKind::RateLimited
        } else if message.contains("API key") {
            ErrorKind::MissingCredential
        } else {
            ErrorKind::Upstream
        };
        Self { kind, message }
    }
}
