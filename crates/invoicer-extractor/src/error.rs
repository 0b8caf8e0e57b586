//! Error types for the Extractor

use invoicer_domain::FailureKind;
use invoicer_store::IndexError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Missing credential or invalid configuration; aborts the batch
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File unreadable, corrupt or of an unsupported type
    #[error("Document read error: {0}")]
    DocumentRead(String),

    /// Embedding service error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// External call exceeded the configured timeout
    #[error("{stage} timed out after {secs}s")]
    Timeout {
        /// Pipeline stage that timed out
        stage: &'static str,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// Vector index error
    #[error("Index error: {0}")]
    Index(String),
}

impl ExtractorError {
    /// Per-document failure category; `None` for errors that abort the batch
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ExtractorError::Configuration(_) => None,
            ExtractorError::DocumentRead(_) => Some(FailureKind::DocumentRead),
            ExtractorError::Embedding(_)
            | ExtractorError::Llm(_)
            | ExtractorError::Timeout { .. }
            | ExtractorError::Index(_) => Some(FailureKind::RetrievalService),
        }
    }
}

impl From<IndexError> for ExtractorError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::Embedding(msg) => ExtractorError::Embedding(msg),
            IndexError::Index(inner) => ExtractorError::Index(inner.to_string()),
        }
    }
}

impl From<lopdf::Error> for ExtractorError {
    fn from(e: lopdf::Error) -> Self {
        ExtractorError::DocumentRead(e.to_string())
    }
}
