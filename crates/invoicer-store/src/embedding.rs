//! Embedding Model for Text Vectorization
//!
//! This module provides the offline embedding model used in tests and for
//! dry runs, plus the similarity function the retriever ranks with.
//!
//! # Mock Implementation
//!
//! `MockEmbeddingModel` hashes each lowercase alphanumeric token into one of
//! `dimension` buckets and normalizes the counts. Texts that share words
//! therefore share buckets and score a higher cosine similarity, which is
//! enough to exercise retrieval without a network service.
//!
//! # Examples
//!
//! ```rust
//! use invoicer_store::embedding::{cosine_similarity, MockEmbeddingModel};
//!
//! let model = MockEmbeddingModel::new(64);
//! let a = model.embed_one("Invoice total 1500");
//! let b = model.embed_one("invoice TOTAL");
//! let c = model.embed_one("shipping address");
//! assert_eq!(a.len(), 64);
//! assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
//! ```

use invoicer_domain::traits::EmbeddingProvider;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Deterministic bag-of-words embedding model for tests
///
/// - **Deterministic**: Same text always produces same embedding
/// - **Normalized**: All vectors have unit length (for cosine similarity)
/// - **Lexical**: Shared words raise similarity
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
    failures: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    model: String,
}

impl MockEmbeddingModel {
    /// Create a new mock embedding model
    ///
    /// # Parameters
    ///
    /// - `dimension`: The embedding dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            failures: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            model: "mock-embedding".to_string(),
        }
    }

    /// Fail any batch in which some text contains `needle`
    pub fn add_failure(&mut self, needle: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(needle.into());
    }

    /// Number of `embed` calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Get the dimension of embeddings produced by this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed a single text synchronously
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        let lowered = text.to_lowercase();
        let mut tokens = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .peekable();

        if tokens.peek().is_none() {
            // Punctuation-only text still needs a non-zero vector
            embedding[Self::bucket(&lowered, self.dimension)] = 1.0;
        } else {
            for token in tokens {
                embedding[Self::bucket(token, self.dimension)] += 1.0;
            }
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        embedding
    }

    fn bucket(token: &str, dimension: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() % dimension as u64) as usize
    }

    fn check_failures(&self, texts: &[String]) -> Result<(), EmbeddingError> {
        let failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        match failures
            .iter()
            .find(|needle| texts.iter().any(|t| t.contains(needle.as_str())))
        {
            Some(needle) => Err(EmbeddingError::InferenceFailed(format!(
                "mock failure triggered by '{}'",
                needle
            ))),
            None => Ok(()),
        }
    }
}

impl EmbeddingProvider for MockEmbeddingModel {
    type Error = EmbeddingError;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failures(texts)?;

        if let Some(pos) = texts.iter().position(|t| t.is_empty()) {
            return Err(EmbeddingError::InvalidInput(format!(
                "Empty text at position {} cannot be embedded",
                pos
            )));
        }

        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in `[-1, 1]`; `0.0` when either vector has zero
/// magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
