//! Invoicer Extractor
//!
//! Turns invoice PDFs into rows of ten canonical fields using
//! retrieval-augmented prompting.
//!
//! # Architecture
//!
//! ```text
//! Document → Segmenter → EmbeddingIndex → retrieve(k) → Prompt → LLM
//!          → parse (tolerant) → normalize → ResultTable row
//! ```
//!
//! # Key Features
//!
//! - **Page-aware segmentation**: PDF pages (via `lopdf`) or form-feed
//!   separated text, split into overlapping chunks
//! - **Per-document retrieval**: a throwaway HNSW index per document
//! - **Tolerant parsing**: model output is repaired, never trusted
//! - **Canonical schema**: every row carries all ten fields as strings
//! - **Batch isolation**: a failing document is skipped and reported
//!   without disturbing the rest, and row order follows input order
//!
//! # Example Usage
//!
//! ```no_run
//! use invoicer_domain::Document;
//! use invoicer_extractor::{Extractor, ExtractorConfig};
//! use invoicer_llm::MockProvider;
//! use invoicer_store::embedding::MockEmbeddingModel;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"Invoice no.": "4521"}"#);
//! let embedder = MockEmbeddingModel::new(64);
//! let config = ExtractorConfig::default().with_api_key("key");
//!
//! let extractor = Extractor::new(llm, embedder, config)?;
//!
//! let documents = vec![Document::new("invoice.pdf", std::fs::read("invoice.pdf")?)];
//! let table = extractor.extract(documents).await?;
//!
//! println!("Rows: {}", table.len());
//! println!("Skipped: {}", table.failures().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod normalizer;
pub mod parser;
mod prompt;
mod segmenter;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, ProviderKind};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use prompt::PromptBuilder;
pub use segmenter::Segmenter;
