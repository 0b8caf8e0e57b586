//! Document module - pipeline inputs and retrieval units

/// One uploaded file
///
/// Consumed once by segmentation; nothing about it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, used as the `file` column of the result row
    pub name: String,

    /// Raw file bytes
    pub content: Vec<u8>,
}

impl Document {
    /// Create a new document from a name and its bytes
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// A contiguous span of document text used as a retrieval unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk text
    pub text: String,

    /// Source page (1-indexed)
    pub page: usize,

    /// Position of this chunk in the document's chunk sequence
    pub index: usize,

    /// Character offset of the chunk within its page
    pub offset: usize,
}
