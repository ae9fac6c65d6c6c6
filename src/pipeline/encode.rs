//! Image encoding: BGRA page buffer → image file on disk.
//!
//! The quality parameter is consulted for JPEG only; WEBP encoding in the
//! `image` crate is lossless, so quality is accepted for it but has no
//! effect, and the remaining formats ignore it entirely. JPEG output drops
//! the alpha channel since the format has no transparency.

use crate::config::ImageFormat;
use crate::pipeline::render::PageImage;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// A failure while encoding a page buffer or writing the file.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("pixel buffer does not match {width}x{height} BGRA dimensions")]
    BufferMismatch { width: u32, height: u32 },
}

/// Encode `page` to `path` in the requested format.
///
/// Returns only after the encoded bytes reach the file, so the caller can
/// treat `Ok` as "this path now exists on disk" and record it in the outcome.
pub fn write_page(
    page: &PageImage,
    path: &Path,
    format: ImageFormat,
    quality: u8,
) -> Result<(), EncodeError> {
    let rgba = to_rgba(page)?;

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel; flatten to RGB before encoding.
            let rgb = DynamicImage::ImageRgba8(rgba).into_rgb8();
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            encoder.encode(rgb.as_raw(), page.width, page.height, ExtendedColorType::Rgb8)?;
            writer.flush()?;
        }
        _ => {
            DynamicImage::ImageRgba8(rgba).save_with_format(path, format.as_image_format())?;
        }
    }

    debug!("wrote page {} → {}", page.index, path.display());
    Ok(())
}

/// Reorder the page's BGRA buffer into an `RgbaImage`.
fn to_rgba(page: &PageImage) -> Result<RgbaImage, EncodeError> {
    let expected = page.width as usize * page.height as usize * 4;
    if page.data.len() != expected {
        return Err(EncodeError::BufferMismatch {
            width: page.width,
            height: page.height,
        });
    }

    let mut data = page.data.clone();
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2); // BGRA → RGBA
    }

    RgbaImage::from_raw(page.width, page.height, data).ok_or(EncodeError::BufferMismatch {
        width: page.width,
        height: page.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn solid_page(index: usize, width: u32, height: u32, bgra: [u8; 4]) -> PageImage {
        let data = bgra
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        PageImage {
            index,
            width,
            height,
            data,
        }
    }

    #[test]
    fn bgra_channels_are_swapped_to_rgba() {
        // Pure blue in BGRA is (255, 0, 0, 255).
        let page = solid_page(1, 2, 2, [255, 0, 0, 255]);
        let rgba = to_rgba(&page).expect("convert");
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let page = PageImage {
            index: 1,
            width: 4,
            height: 4,
            data: vec![0; 7],
        };
        assert!(matches!(
            to_rgba(&page),
            Err(EncodeError::BufferMismatch { .. })
        ));
    }

    #[test]
    fn writes_decodable_png() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("page_1.png");
        let page = solid_page(1, 8, 6, [0, 0, 255, 255]); // red in BGRA

        write_page(&page, &out, ImageFormat::Png, 80).expect("write");

        let decoded = image::open(&out).expect("decode").into_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn writes_jpeg_without_alpha() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("page_1.jpg");
        let page = solid_page(1, 8, 8, [128, 128, 128, 255]);

        write_page(&page, &out, ImageFormat::Jpeg, 90).expect("write");

        let decoded = image::open(&out).expect("decode");
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 8);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("nope").join("page_1.png");
        let page = solid_page(1, 2, 2, [0, 0, 0, 255]);

        let err = write_page(&page, &out, ImageFormat::Png, 80).unwrap_err();
        assert!(matches!(err, EncodeError::Io(_) | EncodeError::Image(_)));
    }
}
