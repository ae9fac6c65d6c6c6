//! Error types for the pdf2img library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`]: **Fatal**: the batch cannot proceed at all (invalid
//!   request, unwritable output root, no usable pdfium library). Returned as
//!   `Err(BatchError)` from [`crate::convert`] before any conversion unit is
//!   dispatched.
//!
//! * [`DocumentError`]: **Non-fatal**: a single document failed (missing
//!   file, corrupt PDF, encode/write error) but all sibling documents are
//!   unaffected. Stored inside [`crate::output::ConversionOutcome`] so callers
//!   can inspect partial success rather than losing the whole batch to one
//!   bad input.
//!
//! Per-document failures are values, never control flow: the coordinator only
//! ever sees successful completion of the dispatch mechanism itself.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2img library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::ConversionOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Request validation failed before any work started.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The output root directory could not be created.
    #[error("failed to create output root '{path}': {source}")]
    OutputRootFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
         Install libpdfium system-wide or place a pdfium shared library next \
         to the executable."
    )]
    RendererUnavailable(String),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal error isolated to a single document's conversion.
///
/// One variant per failure stage, each carrying the source document path so
/// batch-level logs stay attributable without extra context.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The source path does not exist or is not a regular file.
    #[error("document not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The document could not be opened or a page could not be rasterised.
    #[error("failed to render '{path}': {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    /// The document's own output subdirectory could not be created.
    #[error("failed to create output directory '{dir}' for '{path}': {detail}")]
    OutputDirFailed {
        path: PathBuf,
        dir: PathBuf,
        detail: String,
    },

    /// Image encoding or the file write for one page failed.
    #[error("failed to encode or write page {page} of '{path}': {detail}")]
    EncodeFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// The conversion unit panicked; caught at the join boundary.
    #[error("conversion of '{path}' panicked: {detail}")]
    Panicked { path: PathBuf, detail: String },
}
