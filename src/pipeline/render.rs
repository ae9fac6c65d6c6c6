//! Page rasterisation: the renderer seam and its pdfium implementation.
//!
//! ## Why a trait seam?
//!
//! The engine only needs three capabilities from a rendering backend: open a
//! document at a DPI, report its page count, and produce a raw pixel buffer
//! for one page. Putting those behind [`DocumentRenderer`] keeps the batch
//! machinery testable without a pdfium library present and leaves the backend
//! swappable.
//!
//! ## Why BGRA?
//!
//! pdfium rasterises into BGRA natively, and the fixed channel order lets the
//! encoding stage do a single deterministic swap instead of guessing. The
//! buffer layout is part of the [`PageImage`] contract.

use pdfium_render::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// A failure inside the rendering backend.
///
/// Carries the backend's own detail string; the document converter wraps it
/// with the source path before recording it in an outcome.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// One rendered page: 1-based index, dimensions, and a BGRA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-based page index within the document.
    pub index: usize,
    pub width: u32,
    pub height: u32,
    /// Raw pixels in blue-green-red-alpha order, 8 bits per channel,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// A rendering backend capable of opening documents.
pub trait DocumentRenderer: Send + Sync {
    /// Open `path` for rendering at `dpi` dots per inch.
    ///
    /// The returned handle borrows the renderer and is dropped when the
    /// document's conversion unit finishes, releasing backend state
    /// regardless of outcome.
    fn open<'a>(
        &'a self,
        path: &Path,
        dpi: u32,
    ) -> Result<Box<dyn RenderedDocument + 'a>, RenderError>;
}

/// An open document handle.
pub trait RenderedDocument {
    /// Number of pages in the document. May be zero.
    fn page_count(&self) -> usize;

    /// Rasterise the page at 1-based `index` into a BGRA8 buffer.
    fn render_page(&self, index: usize) -> Result<PageImage, RenderError>;
}

/// Production renderer backed by the pdfium library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to a pdfium library: a copy next to the executable first, then
    /// the system library.
    pub fn new() -> Result<Self, RenderError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| RenderError(format!("{e:?}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl DocumentRenderer for PdfiumRenderer {
    fn open<'a>(
        &'a self,
        path: &Path,
        dpi: u32,
    ) -> Result<Box<dyn RenderedDocument + 'a>, RenderError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError(format!("{e:?}")))?;
        debug!("opened '{}': {} pages", path.display(), document.pages().len());
        Ok(Box::new(PdfiumDocument { document, dpi }))
    }
}

/// An open pdfium document plus the resolution it renders at.
struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    dpi: u32,
}

impl RenderedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize) -> Result<PageImage, RenderError> {
        let page = self
            .document
            .pages()
            .get((index - 1) as u16)
            .map_err(|e| RenderError(format!("page {index}: {e:?}")))?;

        // PDF page geometry is in points (1/72 inch); scale to the target DPI.
        let scale = self.dpi as f32 / 72.0;
        let width_px = ((page.width().value * scale).round() as i32).max(1);
        let height_px = ((page.height().value * scale).round() as i32).max(1);

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_maximum_height(height_px);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| RenderError(format!("page {index}: {e:?}")))?;

        let image = bitmap.as_image().into_rgba8();
        let (width, height) = image.dimensions();
        let mut data = image.into_raw();
        for px in data.chunks_exact_mut(4) {
            px.swap(0, 2); // RGBA → BGRA
        }

        debug!("rendered page {index} → {width}x{height} px");

        Ok(PageImage {
            index,
            width,
            height,
            data,
        })
    }
}
