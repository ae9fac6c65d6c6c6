//! Pipeline stages for one document's conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch rendering backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ paths ──▶ render ──▶ encode
//! (scan)   (plan dirs) (pdfium)  (image file)
//! ```
//!
//! 1. [`input`]: expand a file or directory into the ordered document list
//! 2. [`paths`]: deterministic per-document directories and page file names
//! 3. [`render`]: rasterise pages to BGRA buffers; behind a trait so tests
//!    run without a pdfium library
//! 4. [`encode`]: write each buffer to disk in the requested format

pub mod encode;
pub mod input;
pub mod paths;
pub mod render;
