//! Raster decode/encode.
//!
//! The engine only needs "file to RGBA buffer" and back. `FsCodec` does this
//! with the `image` crate; sessions take any `ImageCodec` so tests can swap it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or writing image files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input file does not exist
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    /// File exists but could not be decoded
    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Format name or extension is not one of png, jpeg, webp, bmp
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Encoder or write failure
    #[error("Failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Formats the export path can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl ExportFormat {
    /// Get all supported formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Png,
            ExportFormat::Jpeg,
            ExportFormat::Webp,
            ExportFormat::Bmp,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Webp => "WEBP",
            ExportFormat::Bmp => "BMP",
        }
    }

    /// File extension written for this format (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
            ExportFormat::Bmp => "bmp",
        }
    }

    /// Match a file extension, case-insensitive. `jpg` and `jpeg` both map
    /// to JPEG.
    pub fn from_extension(ext: &str) -> Result<Self, CodecError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "webp" => Ok(ExportFormat::Webp),
            "bmp" => Ok(ExportFormat::Bmp),
            _ => Err(CodecError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| CodecError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Webp => ImageFormat::WebP,
            ExportFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim().trim_start_matches('.'))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode files to RGBA and encode RGBA to files.
pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Result<RgbaImage, CodecError>;

    fn encode(&self, image: &RgbaImage, path: &Path, format: ExportFormat)
    -> Result<(), CodecError>;
}

/// Filesystem codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCodec;

impl ImageCodec for FsCodec {
    fn decode(&self, path: &Path) -> Result<RgbaImage, CodecError> {
        if !path.exists() {
            return Err(CodecError::NotFound(path.to_path_buf()));
        }
        let decoded = image::open(path)
            .map_err(|source| CodecError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        log::debug!(
            "Decoded {:?} ({}x{})",
            path,
            decoded.width(),
            decoded.height()
        );
        Ok(decoded)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: ExportFormat,
    ) -> Result<(), CodecError> {
        let dynamic = DynamicImage::ImageRgba8(image.clone());
        // JPEG has no alpha channel
        let dynamic = match format {
            ExportFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
            _ => dynamic,
        };
        dynamic
            .save_with_format(path, format.image_format())
            .map_err(|source| CodecError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Encoded {:?} as {}", path, format);
        Ok(())
    }
}
