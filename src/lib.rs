//! # pdf2img
//!
//! Batch-convert PDF documents to per-page raster images with bounded
//! concurrency.
//!
//! ## Why this crate?
//!
//! Converting one PDF is easy; converting a folder of them well is not.
//! Running every document at once exhausts memory on large batches, running
//! them one at a time wastes the machine, and a single corrupt file should
//! never abort the other ninety-nine. This crate runs document conversions in
//! parallel under a fixed concurrency cap, isolates every failure to its own
//! document, and aggregates the paths of everything that was actually
//! written.
//!
//! ## Pipeline Overview
//!
//! ```text
//! documents
//!  │
//!  ├─ 1. Validate   DPI, quality clamp, concurrency resolution, output root
//!  ├─ 2. Dispatch   one unit per document behind a permit gate
//!  ├─ 3. Render     rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 4. Encode     BGRA buffer → page_<n>.<ext> on disk
//!  └─ 5. Aggregate  join all units, merge outcomes into a BatchResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert, ConversionRequest, ImageFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = ConversionRequest::builder("out/images")
//!         .document("docs/report.pdf")
//!         .document("docs/invoice.pdf")
//!         .dpi(150)
//!         .format(ImageFormat::Png)
//!         .concurrency(0) // auto: available parallelism
//!         .build()?;
//!
//!     let result = convert(&request).await?;
//!     println!("wrote {} page images", result.outputs.len());
//!     for failure in result.failures() {
//!         eprintln!("failed: {}", failure.source.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Batch-fatal conditions (invalid request, uncreatable output root, missing
//! pdfium library) return [`BatchError`] before any work is dispatched.
//! Everything after dispatch is isolated per document: a missing file, a
//! corrupt PDF, or a failed write marks only that document's
//! [`ConversionOutcome`] as failed and the rest of the batch carries on.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod gate;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use aggregate::ResultAggregator;
pub use config::{ConversionRequest, ConversionRequestBuilder, ImageFormat};
pub use convert::{convert, convert_sync, convert_with_renderer};
pub use document::DocumentConverter;
pub use error::{BatchError, DocumentError};
pub use gate::{ConcurrencyGate, GatePermit};
pub use output::{BatchResult, BatchStats, ConversionOutcome};
pub use pipeline::input::collect_documents;
pub use pipeline::render::{
    DocumentRenderer, PageImage, PdfiumRenderer, RenderError, RenderedDocument,
};
