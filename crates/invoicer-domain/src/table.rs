//! ResultTable module - one row per processed document

use crate::field::Field;
use crate::record::CanonicalRecord;
use std::fmt;

/// Column headers of every result table, in order
pub const COLUMNS: [&str; 11] = [
    "file",
    "Invoice no.",
    "Description",
    "Quantity",
    "Date",
    "Unit price",
    "Amount",
    "Total",
    "Email",
    "Phone number",
    "Address",
];

/// One row: the document identifier plus its canonical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Document name
    pub file: String,

    /// Normalized fields
    pub record: CanonicalRecord,
}

impl ResultRow {
    /// Cell values in [`COLUMNS`] order
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = Vec::with_capacity(COLUMNS.len());
        cells.push(self.file.as_str());
        cells.extend(self.record.iter().map(|(_, value)| value));
        cells
    }

    /// Value of a single field
    pub fn get(&self, field: Field) -> &str {
        self.record.get(field)
    }
}

/// Category of a per-document failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// File unreadable, corrupt or of an unsupported type
    DocumentRead,

    /// Embedding or language-model call failed or timed out
    RetrievalService,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::DocumentRead => f.write_str("document read error"),
            FailureKind::RetrievalService => f.write_str("retrieval service error"),
        }
    }
}

/// A document that was skipped because its pipeline failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// Document name
    pub file: String,

    /// Failure category
    pub kind: FailureKind,

    /// Human-readable reason
    pub message: String,
}

/// Tabular result of a batch
///
/// Rows appear in input document order. Failed documents produce no row
/// and are listed in [`ResultTable::failures`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
    failures: Vec<DocumentFailure>,
}

impl ResultTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Column headers
    pub fn headers(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Rows in input order
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Skipped documents in input order
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row
    pub fn push_row(&mut self, file: impl Into<String>, record: CanonicalRecord) {
        self.rows.push(ResultRow {
            file: file.into(),
            record,
        });
    }

    /// Record a skipped document
    pub fn push_failure(&mut self, failure: DocumentFailure) {
        self.failures.push(failure);
    }
}
