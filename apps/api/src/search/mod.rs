// Boolean query pipeline
// Implements: input/query validation, word counting, simplification, rate limiting,
// response caching, prompt composition and the generation orchestrator.
// All LLM calls go through llm_client; nothing here talks to Anthropic directly.

pub mod cache;
pub mod composer;
pub mod detection;
pub mod handlers;
pub mod links;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod rate_limiter;
pub mod simplifier;
#[cfg(test)]
pub mod testing;
pub mod validator;
pub mod word_count;

// Re-export the public API consumed by main and the router.
pub use detection::MarkerDetectionPolicy;
pub use orchestrator::QueryOrchestrator;
