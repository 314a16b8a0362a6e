//! Test doubles for the model boundary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, ModelParams, TextGenerator};

/// Canned `TextGenerator`: returns the same reply (or error) every time and counts calls.
pub struct FakeGenerator {
    reply: Result<String, (u16, String)>,
    credential: bool,
    calls: AtomicUsize,
    last_system: Mutex<Option<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            credential: true,
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(None),
        }
    }

    /// Fails with an upstream API error.
    pub fn failing() -> Self {
        Self::failing_with(500, "upstream exploded")
    }

    pub fn failing_with(status: u16, message: &str) -> Self {
        Self {
            reply: Err((status, message.to_string())),
            ..Self::replying("")
        }
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn complete(
        &self,
        system: &str,
        _prompt: &str,
        _params: ModelParams,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = Some(system.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => {
                let status = *status;
                Err(match status {
                    429 => LlmError::RateLimited {
                        message: message.to_string(),
                    },
                    401 => LlmError::InvalidApiKey {
                        status,
                        message: message.to_string(),
                    },
                    _ => LlmError::Api {
                        status,
                        message: message.to_string(),
                    },
                })
            }
        }
    }
}
