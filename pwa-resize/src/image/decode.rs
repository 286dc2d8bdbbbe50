//! Image decoding

use anyhow::{Context, Result};
use imageproc::image::{load_from_memory, DynamicImage, ImageReader};

use std::path::Path;

/// Decode an image file, sniffing the format from its content
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    load_from_memory(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Read only the header to get the dimensions
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Failed to open {}", path.display()))?
        .into_dimensions()
        .with_context(|| format!("Failed to decode {}", path.display()))
}
