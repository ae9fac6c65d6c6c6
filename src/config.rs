//! Request types for batch PDF-to-image conversion.
//!
//! All batch behaviour is controlled through [`ConversionRequest`], built via
//! its [`ConversionRequestBuilder`]. Keeping every knob in one immutable
//! struct makes it trivial to share a request across conversion units and to
//! serialise it for logging.
//!
//! # Design choice: closed format enum
//! The output format is a closed [`ImageFormat`] variant matched exhaustively
//! at the encoding step. Unknown format strings are rejected when the request
//! is parsed, never at encode time deep inside a worker.

use crate::error::BatchError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

/// Output image format.
///
/// `jpeg`/`jpg` aliasing is normalised at parse time; the canonical file
/// extension for JPEG output is always `jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Canonical lowercase file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::WebP => "webp",
            ImageFormat::Gif => "gif",
        }
    }

    /// Whether the quality parameter is meaningful for this format.
    ///
    /// Only lossy-capable formats consult it; the rest ignore it.
    pub fn uses_quality(self) -> bool {
        matches!(self, ImageFormat::Jpeg | ImageFormat::WebP)
    }

    /// The corresponding `image` crate format tag.
    pub(crate) fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            "webp" => Ok(ImageFormat::WebP),
            "gif" => Ok(ImageFormat::Gif),
            other => Err(BatchError::InvalidRequest(format!(
                "unsupported image format '{other}' (expected png, jpg, bmp, webp, or gif)"
            ))),
        }
    }
}

/// Configuration for one batch conversion.
///
/// Built via [`ConversionRequest::builder()`]; immutable once built.
///
/// # Example
/// ```rust
/// use pdf2img::{ConversionRequest, ImageFormat};
///
/// let request = ConversionRequest::builder("out/images")
///     .document("docs/report.pdf")
///     .document("docs/invoice.pdf")
///     .dpi(200)
///     .format(ImageFormat::Png)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Source documents, in dispatch order. Duplicates are permitted and each
    /// entry is converted independently.
    pub documents: Vec<PathBuf>,

    /// Root directory under which each document gets its own subdirectory.
    pub output_root: PathBuf,

    /// Rendering resolution in dots per inch. Must be > 0. Default: 150.
    pub dpi: u32,

    /// Output image format. Default: [`ImageFormat::Jpeg`].
    pub format: ImageFormat,

    /// Encoding quality in [1,100]; consulted for JPEG and WEBP only.
    /// Default: 80. The builder clamps out-of-range values to the nearest
    /// bound rather than rejecting the batch.
    pub quality: u8,

    /// Maximum number of documents converted simultaneously.
    /// 0 means auto: resolved to the host's available parallelism at batch
    /// start. Default: 0.
    pub concurrency: usize,
}

impl ConversionRequest {
    /// Create a builder rooted at `output_root`.
    pub fn builder(output_root: impl Into<PathBuf>) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            request: ConversionRequest {
                documents: Vec::new(),
                output_root: output_root.into(),
                dpi: 150,
                format: ImageFormat::Jpeg,
                quality: 80,
                concurrency: 0,
            },
        }
    }

    /// Validate the invariants a hand-constructed request might violate.
    ///
    /// Called by the coordinator before any work starts; an invalid request
    /// fails the whole batch with no partial output.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.dpi == 0 {
            return Err(BatchError::InvalidRequest("dpi must be > 0, got 0".into()));
        }
        if self.quality < 1 || self.quality > 100 {
            return Err(BatchError::InvalidRequest(format!(
                "quality must be in [1,100], got {}",
                self.quality
            )));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(BatchError::InvalidRequest(
                "output root must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve `concurrency` to the positive capacity the gate is built with.
    ///
    /// 0 maps to the host's available parallelism (falling back to 1 when the
    /// host cannot report it). Performed once at batch start, never queried
    /// again mid-run.
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency > 0 {
            self.concurrency
        } else {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        }
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug)]
pub struct ConversionRequestBuilder {
    request: ConversionRequest,
}

impl ConversionRequestBuilder {
    /// Append one source document.
    pub fn document(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.documents.push(path.into());
        self
    }

    /// Replace the document list wholesale, preserving iteration order.
    pub fn documents<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.request.documents = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.request.dpi = dpi;
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.request.format = format;
        self
    }

    /// Set the encoding quality: values outside [1,100] are clamped to the
    /// nearest bound (quality=150 behaves as 100, quality=-5 as 1).
    pub fn quality(mut self, quality: i64) -> Self {
        self.request.quality = quality.clamp(1, 100) as u8;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.request.concurrency = n;
        self
    }

    /// Build the request, validating constraints.
    pub fn build(self) -> Result<ConversionRequest, BatchError> {
        self.request.validate()?;
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_normalises_jpeg_alias() {
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn format_parse_rejects_unknown() {
        let err = "tiff".parse::<ImageFormat>().unwrap_err();
        assert!(err.to_string().contains("tiff"));
    }

    #[test]
    fn format_parse_is_case_insensitive() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("WebP".parse::<ImageFormat>().unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn quality_is_only_used_by_lossy_formats() {
        assert!(ImageFormat::Jpeg.uses_quality());
        assert!(ImageFormat::WebP.uses_quality());
        assert!(!ImageFormat::Png.uses_quality());
        assert!(!ImageFormat::Bmp.uses_quality());
        assert!(!ImageFormat::Gif.uses_quality());
    }

    #[test]
    fn builder_clamps_quality_to_bounds() {
        let high = ConversionRequest::builder("out").quality(150).build().unwrap();
        assert_eq!(high.quality, 100);

        let low = ConversionRequest::builder("out").quality(-5).build().unwrap();
        assert_eq!(low.quality, 1);

        let mid = ConversionRequest::builder("out").quality(80).build().unwrap();
        assert_eq!(mid.quality, 80);
    }

    #[test]
    fn build_rejects_zero_dpi() {
        let err = ConversionRequest::builder("out").dpi(0).build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidRequest(_)));
    }

    #[test]
    fn effective_concurrency_resolves_zero_to_positive() {
        let request = ConversionRequest::builder("out").build().unwrap();
        assert_eq!(request.concurrency, 0);
        assert!(request.effective_concurrency() >= 1);

        let fixed = ConversionRequest::builder("out").concurrency(3).build().unwrap();
        assert_eq!(fixed.effective_concurrency(), 3);
    }

    #[test]
    fn duplicate_documents_are_preserved() {
        let request = ConversionRequest::builder("out")
            .document("a.pdf")
            .document("a.pdf")
            .build()
            .unwrap();
        assert_eq!(request.documents.len(), 2);
    }
}
