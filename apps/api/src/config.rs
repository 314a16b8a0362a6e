use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a tunable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional on purpose: a missing key is reported per request, not at boot.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub search: SearchSettings,
}

/// Tunables of the query pipeline. Defaults mirror the production values.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Google ignores everything past its 32nd word.
    pub max_query_words: usize,
    pub rate_limit_window_ms: i64,
    pub rate_limit_max_requests: u32,
    pub cache_ttl_ms: i64,
    /// `None` keeps the cache unbounded (TTL-on-read eviction only).
    pub cache_max_entries: Option<usize>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_query_words: 32,
            rate_limit_window_ms: 60_000,
            rate_limit_max_requests: 5,
            cache_ttl_ms: 3_600_000,
            cache_max_entries: None,
            temperature: 0.5,
            max_output_tokens: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SearchSettings::default();

        let search = SearchSettings {
            max_query_words: parse_or(&lookup, "MAX_QUERY_WORDS", defaults.max_query_words)?,
            rate_limit_window_ms: parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW_MS",
                defaults.rate_limit_window_ms,
            )?,
            rate_limit_max_requests: parse_or(
                &lookup,
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            )?,
            cache_ttl_ms: parse_or(&lookup, "CACHE_TTL_MS", defaults.cache_ttl_ms)?,
            cache_max_entries: match non_empty(&lookup, "CACHE_MAX_ENTRIES") {
                Some(raw) => Some(
                    raw.parse::<usize>()
                        .context("CACHE_MAX_ENTRIES must be a positive integer")?,
                ),
                None => None,
            },
            temperature: parse_or(&lookup, "LLM_TEMPERATURE", defaults.temperature)?,
            max_output_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", defaults.max_output_tokens)?,
        };

        Ok(Config {
            anthropic_api_key: non_empty(&lookup, "ANTHROPIC_API_KEY"),
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            search,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
