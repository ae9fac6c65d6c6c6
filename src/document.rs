//! Single-document conversion: one source file → a directory of page images.
//!
//! Conversion is a blocking, synchronous operation performed entirely within
//! one worker's unit of work; the coordinator runs it on the blocking pool.
//! Pages are processed strictly in increasing index order because the
//! `page_<n>` naming and no-gaps numbering depend on it.
//!
//! Every failure here becomes a value in the returned
//! [`ConversionOutcome`]; this function never propagates an error to its
//! caller, so one bad document can never take down its siblings.

use crate::config::{ConversionRequest, ImageFormat};
use crate::error::DocumentError;
use crate::output::ConversionOutcome;
use crate::pipeline::render::DocumentRenderer;
use crate::pipeline::{encode, paths};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Converts one document into a sequence of page image files.
pub struct DocumentConverter {
    renderer: Arc<dyn DocumentRenderer>,
    dpi: u32,
    format: ImageFormat,
    quality: u8,
}

impl DocumentConverter {
    pub fn new(renderer: Arc<dyn DocumentRenderer>, request: &ConversionRequest) -> Self {
        Self {
            renderer,
            dpi: request.dpi,
            format: request.format,
            quality: request.quality,
        }
    }

    /// Convert `document`, writing `page_1.<ext>..page_N.<ext>` into
    /// `output_dir`.
    ///
    /// A missing source file yields a failed outcome without creating any
    /// output; a document with zero pages yields a successful outcome with an
    /// empty output list (the directory exists but holds no page files).
    /// Paths are appended to the outcome only after the file is on disk.
    pub fn convert(&self, document: &Path, output_dir: &Path) -> ConversionOutcome {
        let source = document.to_path_buf();

        if !document.is_file() {
            warn!("document not found: '{}', skipping", document.display());
            return ConversionOutcome::failure(
                source.clone(),
                Vec::new(),
                DocumentError::NotFound { path: source },
            );
        }

        if let Err(e) = paths::ensure_dir(output_dir) {
            return ConversionOutcome::failure(
                source.clone(),
                Vec::new(),
                DocumentError::OutputDirFailed {
                    path: source,
                    dir: output_dir.to_path_buf(),
                    detail: e.to_string(),
                },
            );
        }

        let opened = match self.renderer.open(document, self.dpi) {
            Ok(doc) => doc,
            Err(e) => {
                return ConversionOutcome::failure(
                    source.clone(),
                    Vec::new(),
                    DocumentError::RenderFailed {
                        path: source,
                        detail: e.to_string(),
                    },
                );
            }
        };

        let page_count = opened.page_count();
        info!(
            "converting '{}' ({page_count} pages) → '{}'",
            document.display(),
            output_dir.display()
        );

        let mut outputs: Vec<PathBuf> = Vec::with_capacity(page_count);
        for index in 1..=page_count {
            let page = match opened.render_page(index) {
                Ok(page) => page,
                Err(e) => {
                    return ConversionOutcome::failure(
                        source.clone(),
                        outputs,
                        DocumentError::RenderFailed {
                            path: source,
                            detail: e.to_string(),
                        },
                    );
                }
            };

            let out_path = paths::page_path(output_dir, index, self.format);
            if let Err(e) = encode::write_page(&page, &out_path, self.format, self.quality) {
                return ConversionOutcome::failure(
                    source.clone(),
                    outputs,
                    DocumentError::EncodeFailed {
                        path: source,
                        page: index,
                        detail: e.to_string(),
                    },
                );
            }

            // Recorded only now that the file exists on disk.
            let absolute = std::path::absolute(&out_path).unwrap_or(out_path);
            debug!("page {index}/{page_count} → '{}'", absolute.display());
            outputs.push(absolute);
        }

        ConversionOutcome::success(source, outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::{PageImage, RenderError, RenderedDocument};
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Renderer that serves fixed page counts keyed by file stem, rendering
    /// tiny solid-colour pages; never touches pdfium.
    struct FakeRenderer {
        pages_by_stem: HashMap<String, usize>,
    }

    struct FakeDocument {
        pages: usize,
    }

    impl DocumentRenderer for FakeRenderer {
        fn open<'a>(
            &'a self,
            path: &Path,
            _dpi: u32,
        ) -> Result<Box<dyn RenderedDocument + 'a>, RenderError> {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.pages_by_stem.get(&stem) {
                Some(&pages) => Ok(Box::new(FakeDocument { pages })),
                None => Err(RenderError("unreadable document".into())),
            }
        }
    }

    impl RenderedDocument for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn render_page(&self, index: usize) -> Result<PageImage, RenderError> {
            if index == 0 || index > self.pages {
                return Err(RenderError(format!("page {index} out of range")));
            }
            Ok(PageImage {
                index,
                width: 4,
                height: 4,
                data: vec![200; 4 * 4 * 4],
            })
        }
    }

    fn converter(renderer: FakeRenderer, format: ImageFormat) -> DocumentConverter {
        let request = ConversionRequest::builder("unused")
            .format(format)
            .build()
            .unwrap();
        DocumentConverter::new(Arc::new(renderer), &request)
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, b"%PDF-stub").unwrap();
        p
    }

    #[test]
    fn writes_pages_in_order_with_no_gaps() {
        let tmp = TempDir::new().unwrap();
        let doc = touch(tmp.path(), "report.pdf");
        let out_dir = tmp.path().join("out/report");

        let c = converter(
            FakeRenderer {
                pages_by_stem: HashMap::from([("report".to_string(), 3)]),
            },
            ImageFormat::Png,
        );
        let outcome = c.convert(&doc, &out_dir);

        assert!(outcome.is_success());
        assert_eq!(outcome.outputs.len(), 3);
        for (i, path) in outcome.outputs.iter().enumerate() {
            assert!(path.is_absolute());
            assert!(path.ends_with(format!("page_{}.png", i + 1)), "got {path:?}");
            assert!(path.is_file(), "{path:?} must exist on disk");
        }
    }

    #[test]
    fn zero_page_document_succeeds_with_empty_outputs() {
        let tmp = TempDir::new().unwrap();
        let doc = touch(tmp.path(), "empty.pdf");
        let out_dir = tmp.path().join("out/empty");

        let c = converter(
            FakeRenderer {
                pages_by_stem: HashMap::from([("empty".to_string(), 0)]),
            },
            ImageFormat::Png,
        );
        let outcome = c.convert(&doc, &out_dir);

        assert!(outcome.is_success());
        assert!(outcome.outputs.is_empty());
        assert!(out_dir.is_dir(), "directory is created even with no pages");
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn missing_document_fails_without_creating_output() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("ghost.pdf");
        let out_dir = tmp.path().join("out/ghost");

        let c = converter(
            FakeRenderer {
                pages_by_stem: HashMap::new(),
            },
            ImageFormat::Png,
        );
        let outcome = c.convert(&doc, &out_dir);

        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.error,
            Some(DocumentError::NotFound { .. })
        ));
        assert!(outcome.outputs.is_empty());
        assert!(!out_dir.exists(), "no output dir for a missing document");
    }

    #[test]
    fn unreadable_document_is_wrapped_with_source_path() {
        let tmp = TempDir::new().unwrap();
        let doc = touch(tmp.path(), "corrupt.pdf");
        let out_dir = tmp.path().join("out/corrupt");

        // Stem is absent from the map, so open() fails.
        let c = converter(
            FakeRenderer {
                pages_by_stem: HashMap::new(),
            },
            ImageFormat::Png,
        );
        let outcome = c.convert(&doc, &out_dir);

        match outcome.error {
            Some(DocumentError::RenderFailed { ref path, .. }) => {
                assert_eq!(path, &doc);
            }
            other => panic!("expected RenderFailed, got {other:?}"),
        }
        assert!(outcome.outputs.is_empty());
    }

    #[test]
    fn jpeg_extension_is_jpg() {
        let tmp = TempDir::new().unwrap();
        let doc = touch(tmp.path(), "photo.pdf");
        let out_dir = tmp.path().join("out/photo");

        let c = converter(
            FakeRenderer {
                pages_by_stem: HashMap::from([("photo".to_string(), 1)]),
            },
            ImageFormat::Jpeg,
        );
        let outcome = c.convert(&doc, &out_dir);

        assert!(outcome.is_success());
        assert!(outcome.outputs[0].ends_with("page_1.jpg"));
    }
}
