//! Output path planning: deterministic per-document directories and
//! per-page file names.
//!
//! Each document writes only under its own subdirectory, so there is no
//! cross-document filesystem contention; directory creation is the one
//! operation invoked concurrently and `create_dir_all` is idempotent.

use crate::config::ImageFormat;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// The subdirectory a document's pages land in:
/// `output_root / stem(document)`, where `stem` strips the directory and
/// extension.
pub fn document_output_dir(output_root: &Path, document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .unwrap_or_else(|| OsStr::new("document"));
    output_root.join(stem)
}

/// File name for the page at 1-based `index`: `page_<index>.<ext>`.
pub fn page_file_name(index: usize, format: ImageFormat) -> String {
    format!("page_{index}.{}", format.extension())
}

/// Full path for one page file inside `output_dir`.
pub fn page_path(output_dir: &Path, index: usize, format: ImageFormat) -> PathBuf {
    output_dir.join(page_file_name(index, format))
}

/// Create `dir` and any missing ancestors. Idempotent and safe to call
/// concurrently for distinct targets.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_uses_document_stem() {
        let dir = document_output_dir(Path::new("/out"), Path::new("/docs/report.pdf"));
        assert_eq!(dir, PathBuf::from("/out/report"));
    }

    #[test]
    fn output_dir_strips_only_last_extension() {
        let dir = document_output_dir(Path::new("out"), Path::new("archive.2024.pdf"));
        assert_eq!(dir, PathBuf::from("out/archive.2024"));
    }

    #[test]
    fn page_names_are_one_based_with_canonical_extension() {
        assert_eq!(page_file_name(1, ImageFormat::Png), "page_1.png");
        assert_eq!(page_file_name(12, ImageFormat::Jpeg), "page_12.jpg");
        assert_eq!(page_file_name(3, ImageFormat::WebP), "page_3.webp");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let target = tmp.path().join("a/b/c");
        ensure_dir(&target).expect("first create");
        ensure_dir(&target).expect("second create must also succeed");
        assert!(target.is_dir());
    }
}
