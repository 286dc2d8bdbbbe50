//! Image pipeline: decode, Lanczos resample, re-encode

mod decode;
mod encode;
mod transform;

// Re-export public API
pub use decode::{decode, read_dimensions};
pub use encode::{compress_to_jpeg, compress_to_png, compress_to_webp, encode, PngCompression};
pub use transform::resize;

use anyhow::Result;

use std::path::Path;

/// Encoding written back to disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageFormat {
    Jpeg { quality: u8 },
    Png { compression: PngCompression },
    WebP { quality: u8 },
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg { .. } => "jpg",
            ImageFormat::Png { .. } => "png",
            ImageFormat::WebP { .. } => "webp",
        }
    }

    /// Pick the encoding from the file extension, the same way saving by
    /// file name does. The source encoding is irrelevant.
    pub fn from_path(path: &Path, options: &EncodeOptions) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("png") => Ok(ImageFormat::Png {
                compression: options.png_compression,
            }),
            Some("jpg" | "jpeg") => Ok(ImageFormat::Jpeg {
                quality: options.quality,
            }),
            Some("webp") => Ok(ImageFormat::WebP {
                quality: options.quality,
            }),
            _ => anyhow::bail!("Unsupported image format: {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    /// JPEG/WebP quality, 0-100
    pub quality: u8,
    pub png_compression: PngCompression,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: 90,
            png_compression: PngCompression::Default,
        }
    }
}
