//! Invoicer Retrieval Layer
//!
//! Builds a throwaway similarity index over one document's chunks and
//! answers top-k queries against it.
//!
//! # Architecture
//!
//! - Chunk texts are embedded in a single batch call
//! - Vectors go into an in-memory HNSW graph sized for the document
//! - Results are re-scored with exact cosine similarity
//! - Nothing is persisted; the index is dropped with the document
//!
//! # Examples
//!
//! ```
//! use invoicer_domain::Chunk;
//! use invoicer_store::embedding::MockEmbeddingModel;
//! use invoicer_store::EmbeddingIndex;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let chunks = vec![
//!     Chunk { text: "Bill to: ACME Corp".into(), page: 1, index: 0, offset: 0 },
//!     Chunk { text: "Invoice total 1500".into(), page: 1, index: 1, offset: 19 },
//! ];
//! let embedder = MockEmbeddingModel::new(64);
//! let index = EmbeddingIndex::build(&embedder, chunks).await.unwrap();
//!
//! let top = index.retrieve(&embedder, "invoice total", 1).await.unwrap();
//! assert_eq!(top[0].index, 1);
//! # });
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod vector_index;

use invoicer_domain::traits::EmbeddingProvider;
use invoicer_domain::Chunk;
use thiserror::Error;
use tracing::debug;
use vector_index::{VectorIndex, VectorIndexError};

/// Errors that can occur while building or querying an index
#[derive(Error, Debug)]
pub enum IndexError {
    /// The embedding service failed or returned something unusable
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    Index(#[from] VectorIndexError),
}

/// Per-document similarity index over chunks
///
/// Built once per document; immutable afterwards.
pub struct EmbeddingIndex {
    chunks: Vec<Chunk>,
    vectors: Option<VectorIndex>,
}

impl EmbeddingIndex {
    /// Embed every chunk and index the vectors
    ///
    /// Exactly one embedding call is made, or none when `chunks` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Embedding`] when the embedder fails, returns
    /// the wrong number of vectors, or returns vectors of differing size.
    pub async fn build<E: EmbeddingProvider>(
        embedder: &E,
        chunks: Vec<Chunk>,
    ) -> Result<Self, IndexError> {
        if chunks.is_empty() {
            return Ok(Self {
                chunks,
                vectors: None,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder
            .embed(&texts)
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?;

        if embeddings.len() != chunks.len() {
            return Err(IndexError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings[0].len();
        if dimension == 0 {
            return Err(IndexError::Embedding("empty embedding vector".to_string()));
        }
        if let Some(odd) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(IndexError::Embedding(format!(
                "embedding sizes differ: {} and {}",
                dimension,
                odd.len()
            )));
        }

        let mut index = VectorIndex::new(dimension, chunks.len());
        for embedding in &embeddings {
            index.add(embedding)?;
        }

        debug!(
            chunks = chunks.len(),
            dimension,
            model = embedder.model_name(),
            "Built chunk index"
        );

        Ok(Self {
            chunks,
            vectors: Some(index),
        })
    }

    /// Return the `k` chunks most similar to `query`
    ///
    /// - `k == 0` or an empty index returns nothing, without embedding
    /// - A blank query returns the first `k` chunks in document order
    /// - Otherwise chunks are ordered by cosine similarity to the query
    ///   embedding, ties broken by chunk order
    pub async fn retrieve<E: EmbeddingProvider>(
        &self,
        embedder: &E,
        query: &str,
        k: usize,
    ) -> Result<Vec<&Chunk>, IndexError> {
        let vectors = match &self.vectors {
            Some(vectors) if k > 0 => vectors,
            _ => return Ok(Vec::new()),
        };

        if query.trim().is_empty() {
            return Ok(self.chunks.iter().take(k).collect());
        }

        let query_embedding = embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| IndexError::Embedding("no vector for query".to_string()))?;

        let hits = vectors.search(&query_embedding, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|(id, _)| self.chunks.get(id))
            .collect())
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
