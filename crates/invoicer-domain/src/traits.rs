//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! the network services it depends on. Implementations live in other crates.
//!
//! Both calls are asynchronous so the orchestrator can bound them with a
//! timeout and drop them when a document is abandoned.

use std::fmt::Display;
use std::future::Future;

/// Trait for language model completion
///
/// Implemented by the infrastructure layer (invoicer-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error: Display;

    /// Complete a prompt at temperature 0 and return the full text response
    ///
    /// An empty string means the model produced no answer.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Identifier of the model used for completions
    fn model_name(&self) -> &str;
}

/// Trait for text embedding
///
/// Implemented by the infrastructure layer (invoicer-llm, invoicer-store)
pub trait EmbeddingProvider {
    /// Error type for embedding operations
    type Error: Display;

    /// Embed a batch of texts, returning one vector per input in input order
    fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>, Self::Error>> + Send;

    /// Identifier of the embedding model
    fn model_name(&self) -> &str;
}
