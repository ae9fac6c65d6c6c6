//! Input discovery: expand a user-supplied path into the document list.
//!
//! A directory is scanned non-recursively for top-level `.pdf` files, sorted
//! by name so a directory containing one document behaves identically to
//! naming that document directly.

use crate::error::BatchError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The one recognised document extension.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Whether `path` carries the recognised document extension
/// (case-insensitive).
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
        .unwrap_or(false)
}

/// Expand `input` into an ordered list of source documents.
///
/// A single recognised file yields itself; a directory yields its top-level
/// recognised files sorted by name. Anything else is a structural error that
/// aborts before any work starts.
pub fn collect_documents(input: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if input.is_dir() {
        let entries = std::fs::read_dir(input).map_err(|e| {
            BatchError::InvalidRequest(format!(
                "cannot read input directory '{}': {e}",
                input.display()
            ))
        })?;

        let mut documents: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_document(p))
            .collect();
        documents.sort();

        debug!(
            "found {} document(s) in directory '{}'",
            documents.len(),
            input.display()
        );
        Ok(documents)
    } else if input.is_file() && is_document(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(BatchError::InvalidRequest(format!(
            "input path is not a .{DOCUMENT_EXTENSION} file or a directory: '{}'",
            input.display()
        )))
    }
}
