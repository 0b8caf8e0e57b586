//! Invoicer Domain Layer
//!
//! This crate contains the core types of the invoice extraction pipeline.
//! It has ZERO external dependencies and defines the canonical output schema,
//! the per-document pipeline values and the trait interfaces that the
//! provider and storage crates implement.
//!
//! ## Key Concepts
//!
//! - **Field**: One of the ten canonical invoice fields, in fixed order
//! - **CanonicalRecord**: All ten fields, always present, post-normalization
//! - **Document / Chunk**: An uploaded file and the retrieval units cut from it
//! - **ResultTable**: One row per successfully processed document
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and invariants only
//! - Network providers live in `invoicer-llm`, indexing in `invoicer-store`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod field;
pub mod record;
pub mod table;
pub mod traits;

// Re-exports for convenience
pub use document::{Chunk, Document};
pub use field::{Field, FieldKind};
pub use record::CanonicalRecord;
pub use table::{DocumentFailure, FailureKind, ResultRow, ResultTable, COLUMNS};
