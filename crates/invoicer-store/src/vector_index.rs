//! HNSW Vector Index for Chunk Search
//!
//! This module provides a wrapper around the HNSW algorithm for
//! nearest-neighbor search over one document's chunk embeddings.
//!
//! # Architecture
//!
//! - One index per document, sized to its chunk count
//! - Ids are chunk positions, so no external id map is needed
//! - Raw vectors are kept alongside the graph for exact re-scoring
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Size of dynamic candidate list during construction (default: 200)
//! - **efSearch**: Size of dynamic candidate list during search, at least the
//!   number of candidates requested

use crate::embedding::cosine_similarity;
use hnsw_rs::prelude::*;
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const MIN_EF_SEARCH: usize = 64;

/// Errors that can occur during vector index operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Index is full
    #[error("Index capacity of {0} vectors exceeded")]
    CapacityExceeded(usize),
}

/// A wrapper around HNSW for vector similarity search
///
/// Vectors are identified by insertion order, which callers use as the
/// chunk index.
///
/// # Examples
///
/// ```
/// use invoicer_store::vector_index::VectorIndex;
///
/// let mut index = VectorIndex::new(3, 2);
/// index.add(&[1.0, 0.0, 0.0]).unwrap();
/// index.add(&[0.0, 1.0, 0.0]).unwrap();
///
/// let results = index.search(&[0.9, 0.1, 0.0], 1).unwrap();
/// assert_eq!(results[0].0, 0);
/// ```
pub struct VectorIndex {
    /// Expected embedding dimension
    dimension: usize,

    /// Maximum number of vectors
    capacity: usize,

    /// HNSW graph; ids are positions in `vectors`
    hnsw: Hnsw<'static, f32, DistCosine>,

    /// Stored vectors, for exact similarity
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Create a new vector index with the specified dimension and capacity
    pub fn new(dimension: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);

        // Calculate number of layers based on expected data size
        let nb_layer = 16.min((capacity as f32).ln().trunc() as usize).max(1);

        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            DEFAULT_M,
            capacity,
            nb_layer,
            DEFAULT_EF_CONSTRUCTION,
            DistCosine {},
        );

        Self {
            dimension,
            capacity,
            hnsw,
            vectors: Vec::with_capacity(capacity),
        }
    }

    /// Add a vector; returns its id
    pub fn add(&mut self, embedding: &[f32]) -> Result<usize, VectorIndexError> {
        self.check_dimension(embedding)?;
        if self.vectors.len() >= self.capacity {
            return Err(VectorIndexError::CapacityExceeded(self.capacity));
        }

        let id = self.vectors.len();
        let embedding_vec = embedding.to_vec();
        self.hnsw.insert((&embedding_vec, id));
        self.vectors.push(embedding_vec);

        Ok(id)
    }

    /// Search for the k nearest neighbors to the given embedding
    ///
    /// Returns `(id, similarity)` pairs. Candidates from the graph are
    /// re-scored with exact cosine similarity and sorted by similarity
    /// descending, ties broken by the lower id.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, VectorIndexError> {
        self.check_dimension(query)?;
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let ef_search = MIN_EF_SEARCH.max(self.vectors.len());
        let mut scored: Vec<(usize, f32)> = self
            .hnsw
            .search(query, self.vectors.len(), ef_search)
            .into_iter()
            .filter_map(|neighbour| {
                self.vectors
                    .get(neighbour.d_id)
                    .map(|v| (neighbour.d_id, cosine_similarity(query, v)))
            })
            .collect();

        // The graph is approximate; make sure nothing is missing
        if scored.len() < self.vectors.len() {
            let mut seen = vec![false; self.vectors.len()];
            for (id, _) in &scored {
                seen[*id] = true;
            }
            for (id, v) in self.vectors.iter().enumerate() {
                if !seen[id] {
                    scored.push((id, cosine_similarity(query, v)));
                }
            }
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.dedup_by_key(|(id, _)| *id);
        scored.truncate(k);

        Ok(scored)
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(dim: usize, i: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[i] = 1.0;
        v
    }

    #[test]
    fn test_vector_index_creation() {
        let index = VectorIndex::new(384, 10);
        assert_eq!(index.dimension(), 384);
        assert!(index.is_empty());
    }

    #[test]
    fn test_add_and_search() {
        let mut index = VectorIndex::new(8, 4);
        for i in 0..4 {
            assert_eq!(index.add(&axis(8, i)).unwrap(), i);
        }
        assert_eq!(index.len(), 4);

        let mut query = axis(8, 2);
        query[3] = 0.5;
        let results = index.search(&query, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 2);
        assert_eq!(results[1].0, 3);
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let mut index = VectorIndex::new(4, 3);
        index.add(&axis(4, 1)).unwrap();
        index.add(&axis(4, 0)).unwrap();
        index.add(&axis(4, 0)).unwrap();

        let results = index.search(&axis(4, 0), 3).unwrap();
        let ids: Vec<usize> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_k_larger_than_len() {
        let mut index = VectorIndex::new(4, 2);
        index.add(&axis(4, 0)).unwrap();
        index.add(&axis(4, 1)).unwrap();

        assert_eq!(index.search(&axis(4, 0), 10).unwrap().len(), 2);
        assert!(index.search(&axis(4, 0), 0).unwrap().is_empty());
    }

    #[test]
    fn test_single_element_index() {
        let mut index = VectorIndex::new(4, 1);
        index.add(&axis(4, 3)).unwrap();
        let results = index.search(&axis(4, 3), 5).unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].1 - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = VectorIndex::new(384, 2);

        let result = index.add(&[0.1; 128]);
        assert_eq!(
            result,
            Err(VectorIndexError::DimensionMismatch {
                expected: 384,
                actual: 128
            })
        );
        assert!(index.search(&[0.1; 3], 1).is_err());
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut index = VectorIndex::new(2, 1);
        index.add(&[1.0, 0.0]).unwrap();
        assert_eq!(
            index.add(&[0.0, 1.0]),
            Err(VectorIndexError::CapacityExceeded(1))
        );
    }
}
