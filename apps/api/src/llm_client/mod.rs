/// LLM Client: the single point of entry for all model calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through the `TextGenerator` trait.
///
/// Calls are never retried here: a failed call is a terminal pipeline error and the
/// caller decides whether to try again.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured for the language model")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API key (status {status}): {message}")]
    InvalidApiKey { status: u16, message: String },

    #[error("Upstream rate limit reached: {message}")]
    RateLimited { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call sampling parameters. Not part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 1000,
        }
    }
}

/// Black-box text generation: system prompt + user prompt in, free text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a credential is configured. Checked before any call is attempted.
    fn has_credential(&self) -> bool;

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: ModelParams,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct LlmResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API implementation of `TextGenerator`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    async fn call(
        &self,
        prompt: &str,
        system: &str,
        params: ModelParams,
    ) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(status.as_u16(), message));
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: ModelParams,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, system, params).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn classify_status(status: u16, message: String) -> LlmError {
    match status {
        401 | 403 => LlmError::InvalidApiKey { status, message },
        429 => LlmError::RateLimited { message },
        _ => LlmError::Api { status, message },
    }
}

/// Strips ```lang ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    // Skip an optional language tag on the opening fence line
    let body = match stripped.find('\n') {
        Some(idx) if !stripped[..idx].trim().contains(' ') => &stripped[idx + 1..],
        _ => stripped,
    };
    body.trim()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_tag() {
        let input = "```text\nsite:acme.com inurl:team\n```";
        assert_eq!(strip_code_fences(input), "site:acme.com inurl:team");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\nsite:acme.com inurl:team\n```";
        assert_eq!(strip_code_fences(input), "site:acme.com inurl:team");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  site:acme.com inurl:team ";
        assert_eq!(strip_code_fences(input), "site:acme.com inurl:team");
    }

    #[test]
    fn test_strip_code_fences_unterminated() {
        let input = "```\nsite:acme.com inurl:team";
        assert_eq!(strip_code_fences(input), "site:acme.com inurl:team");
    }

    #[test]
    fn test_status_classification_messages() {
        let err = classify_status(429, "slow down".to_string());
        assert!(err.to_string().contains("rate limit"));

        let err = classify_status(401, "invalid x-api-key".to_string());
        assert!(err.to_string().contains("API key"));

        let err = classify_status(500, "overloaded".to_string());
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }

    #[test]
    fn test_missing_key_message_mentions_api_key() {
        assert!(LlmError::MissingApiKey.to_string().contains("API key"));
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "tool_use", "text": null},
                {"type": "text", "text": "site:linkedin.com/in (java) AND spring"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();
        assert_eq!(
            response.text(),
            Some("site:linkedin.com/in (java) AND spring")
        );
    }

    #[test]
    fn test_client_without_key_has_no_credential() {
        let client = LlmClient::new(None).unwrap();
        assert!(!client.has_credential());
        let client = LlmClient::new(Some("sk-test".to_string())).unwrap();
        assert!(client.has_credential());
    }
}
