//! Local image import.
//!
//! Turns image files into the data URLs the asset store holds, together
//! with their pixel dimensions (the drop handler sizes a section from the
//! aspect ratio).
//!
//! | Step | Crate |
//! |------|-------|
//! | Directory walk | `walkdir`, sorted by file name |
//! | Dimensions | `image::ImageReader::into_dimensions` (header only) |
//! | Encoding | `base64` standard alphabet |
//! | Fan-out | `rayon`, input order preserved |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use rayon::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported image type: {0}")]
    Unsupported(PathBuf),
    #[error("could not read image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// File extensions accepted for import.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// An image read into memory as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl LoadedImage {
    /// Height the image takes when scaled to `page_width`. `None` for a
    /// zero-width image.
    pub fn height_at(&self, page_width: f64) -> Option<f64> {
        if self.width == 0 {
            return None;
        }
        Some(page_width * self.height as f64 / self.width as f64)
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn is_image_file(path: &Path) -> bool {
    mime_for(path).is_some()
}

/// `data:<mime>;base64,<payload>` for raw bytes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read one image file.
pub fn load_image(path: &Path) -> Result<LoadedImage, ImportError> {
    let mime = mime_for(path).ok_or_else(|| ImportError::Unsupported(path.to_path_buf()))?;
    let bytes = fs::read(path)?;
    let (width, height) = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|source| ImportError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), width, height, "loaded image");
    Ok(LoadedImage {
        data_url: data_url(mime, &bytes),
        width,
        height,
    })
}

/// Image files under `dir`, sorted by file name. A path to a single file
/// is returned as-is when it is an image.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    if dir.is_file() {
        return Ok(if is_image_file(dir) {
            vec![dir.to_path_buf()]
        } else {
            Vec::new()
        });
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Load many images in parallel. Output order follows `paths`; the first
/// failure is returned.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<LoadedImage>, ImportError> {
    paths.par_iter().map(|p| load_image(p)).collect()
}
