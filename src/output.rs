//! Result types: per-document outcomes and the batch-wide aggregate.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The per-document record produced by one conversion unit.
///
/// Success and failure are both values: a failed conversion yields an outcome
/// with `error` set, it never surfaces as an `Err` at the batch level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// The source document path as it appeared in the request.
    pub source: PathBuf,

    /// Absolute paths of the page files written, in page order.
    ///
    /// Empty if the document had zero pages or failed before any page
    /// completed. A path is only appended after the file is durably written;
    /// on failure mid-document the paths written so far are retained here for
    /// diagnostics but excluded from the batch aggregate.
    pub outputs: Vec<PathBuf>,

    /// The failure, if any. `None` means the document converted fully.
    pub error: Option<DocumentError>,
}

impl ConversionOutcome {
    /// A fully converted document.
    pub fn success(source: PathBuf, outputs: Vec<PathBuf>) -> Self {
        Self {
            source,
            outputs,
            error: None,
        }
    }

    /// A failed document, keeping any pages written before the failure.
    pub fn failure(source: PathBuf, outputs: Vec<PathBuf>, error: DocumentError) -> Self {
        Self {
            source,
            outputs,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary counters for one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Documents dispatched (equals the request's document count).
    pub total_documents: usize,
    /// Documents that converted fully.
    pub succeeded: usize,
    /// Documents that failed (missing, render error, write error, panic).
    pub failed: usize,
    /// Page files written by successful documents.
    pub pages_written: usize,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub duration_ms: u64,
    /// The gate capacity actually used after resolving concurrency=0.
    pub effective_concurrency: usize,
}

/// The batch-wide result returned by [`crate::convert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Flattened output paths of every *successful* outcome.
    ///
    /// Arrival order is unspecified; callers needing a stable order must sort.
    /// Failed documents contribute nothing here.
    pub outputs: Vec<PathBuf>,

    /// Every per-document outcome, including failed ones, for diagnostics.
    pub outcomes: Vec<ConversionOutcome>,

    /// Batch summary counters.
    pub stats: BatchStats,
}

impl BatchResult {
    /// Outcomes that failed, for warning logs and exit decisions.
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
