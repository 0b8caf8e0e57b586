//! Invoicer LLM Provider Layer
//!
//! Pluggable language-model and embedding providers.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` and
//! `EmbeddingProvider` traits from `invoicer-domain`. Every provider
//! completes at temperature 0 and returns the model's full text answer.
//!
//! # Providers
//!
//! - `GeminiProvider`: Google Generative Language API (requires an API key)
//! - `OllamaProvider`: Local Ollama API integration
//! - `MockProvider`: Deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use invoicer_llm::MockProvider;
//! use invoicer_domain::traits::LlmProvider;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = MockProvider::new("{\"Total\": \"10\"}");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "{\"Total\": \"10\"}");
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;
mod http;
pub mod ollama;

use invoicer_domain::traits::LlmProvider;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses are chosen by the first registered needle the prompt contains,
/// falling back to the default response.
///
/// # Examples
///
/// ```
/// use invoicer_llm::MockProvider;
/// use invoicer_domain::traits::LlmProvider;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut provider = MockProvider::new("{}");
/// provider.add_response("Invoice No: 7", "{\"Invoice no.\": \"7\"}");
/// provider.add_error("corrupted");
///
/// assert_eq!(provider.complete("... Invoice No: 7 ...").await.unwrap(), "{\"Invoice no.\": \"7\"}");
/// assert_eq!(provider.complete("anything else").await.unwrap(), "{}");
/// assert!(provider.complete("a corrupted page").await.is_err());
/// assert_eq!(provider.call_count(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            latency: None,
            model: "mock".to_string(),
        }
    }

    /// Return `response` for prompts containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail with `LlmError::Other` for prompts containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Error));
    }

    /// Delay every completion by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// All prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Reset the recorded prompts
    pub fn reset_call_count(&self) {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let reply = self.reply_for(prompt);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
