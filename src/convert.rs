//! Batch coordination: dispatch, gate, join, aggregate.
//!
//! ## Lifecycle
//!
//! `Idle → Running → Completed`. The batch is `Completed` only after every
//! dispatched unit has finished, successfully or not. There is no cancelled
//! state and no way to abort an in-flight batch; once dispatched, a unit runs
//! to completion or failure. This is a known limitation, not an oversight.
//!
//! ## Dispatch shape
//!
//! For each document, in request order: wait at the gate for a permit, then
//! spawn an independent unit that runs the blocking conversion on the
//! blocking pool, records its outcome with the aggregator, and releases the
//! permit as its very last action. Acquiring *before* spawning means at most
//! `capacity` units exist at any instant and the excess documents queue at
//! the acquire point.

use crate::aggregate::ResultAggregator;
use crate::config::ConversionRequest;
use crate::document::DocumentConverter;
use crate::error::{BatchError, DocumentError};
use crate::gate::ConcurrencyGate;
use crate::output::{BatchResult, ConversionOutcome};
use crate::pipeline::paths;
use crate::pipeline::render::{DocumentRenderer, PdfiumRenderer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Convert every document in `request`, bounded by its concurrency limit.
///
/// This is the primary entry point for the library. Uses the pdfium rendering
/// backend; see [`convert_with_renderer`] to supply a different one.
///
/// # Errors
/// Returns `Err(BatchError)` only for batch-fatal conditions (invalid
/// request, unusable pdfium library, uncreatable output root), always before
/// any conversion unit is dispatched. Per-document failures are reported
/// inside the `Ok` result's outcomes.
pub async fn convert(request: &ConversionRequest) -> Result<BatchResult, BatchError> {
    let renderer =
        PdfiumRenderer::new().map_err(|e| BatchError::RendererUnavailable(e.to_string()))?;
    convert_with_renderer(request, Arc::new(renderer)).await
}

/// [`convert`] with an explicit rendering backend.
pub async fn convert_with_renderer(
    request: &ConversionRequest,
    renderer: Arc<dyn DocumentRenderer>,
) -> Result<BatchResult, BatchError> {
    let start = Instant::now();

    request.validate()?;
    let concurrency = request.effective_concurrency();
    info!(
        documents = request.documents.len(),
        dpi = request.dpi,
        format = ?request.format,
        quality = request.quality,
        concurrency,
        "starting batch conversion"
    );

    let aggregator = ResultAggregator::new();
    if request.documents.is_empty() {
        return Ok(aggregator.finish(start.elapsed().as_millis() as u64, concurrency));
    }

    std::fs::create_dir_all(&request.output_root).map_err(|source| {
        BatchError::OutputRootFailed {
            path: request.output_root.clone(),
            source,
        }
    })?;

    let gate = ConcurrencyGate::new(concurrency);
    let converter = Arc::new(DocumentConverter::new(renderer, request));

    let mut units = Vec::with_capacity(request.documents.len());
    for document in &request.documents {
        let permit = gate.acquire().await;

        let document = document.clone();
        let output_dir = paths::document_output_dir(&request.output_root, &document);
        let converter = Arc::clone(&converter);
        let aggregator = aggregator.clone();

        units.push(tokio::spawn(async move {
            let source = document.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                converter.convert(&document, &output_dir)
            })
            .await
            .unwrap_or_else(|join_err| {
                // A panicked unit still produces an outcome; it must not
                // escape to the coordinator or its siblings.
                ConversionOutcome::failure(
                    source.clone(),
                    Vec::new(),
                    DocumentError::Panicked {
                        path: source,
                        detail: join_err.to_string(),
                    },
                )
            });

            if let Some(error) = &outcome.error {
                warn!("{error}");
            }
            aggregator.add(outcome);
            drop(permit);
        }));
    }

    // Full join barrier: the batch completes only when every unit has.
    for joined in futures::future::join_all(units).await {
        joined
            .map_err(|e| BatchError::Internal(format!("conversion unit failed to join: {e}")))?;
    }

    let result = aggregator.finish(start.elapsed().as_millis() as u64, concurrency);
    info!(
        succeeded = result.stats.succeeded,
        failed = result.stats.failed,
        pages = result.stats.pages_written,
        duration_ms = result.stats.duration_ms,
        "batch conversion finished"
    );
    Ok(result)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(request: &ConversionRequest) -> Result<BatchResult, BatchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BatchError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(convert(request))
}
