//! Reading invoice files from disk.

use invoicer_domain::{Document, DocumentFailure, FailureKind};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Files that were read, and those that could not be
#[derive(Debug, Default)]
pub struct LoadedFiles {
    /// Readable files, in command-line order
    pub documents: Vec<Document>,

    /// Files that could not be read
    pub failures: Vec<DocumentFailure>,
}

/// Read every path into a [`Document`] named after its file name.
///
/// Unreadable paths become `DocumentRead` failures instead of aborting.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> LoadedFiles {
    let mut loaded = LoadedFiles::default();

    for path in paths {
        let path = path.as_ref();
        let name = display_name(path);

        match fs::read(path) {
            Ok(content) => {
                debug!(file = %name, bytes = content.len(), "Read file");
                loaded.documents.push(Document::new(name, content));
            }
            Err(e) => loaded.failures.push(DocumentFailure {
                file: name,
                kind: FailureKind::DocumentRead,
                message: format!("cannot read {}: {}", path.display(), e),
            }),
        }
    }

    loaded
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
