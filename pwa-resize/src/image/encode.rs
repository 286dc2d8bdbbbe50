//! Image encoding: JPEG, PNG, WebP

use anyhow::{Context, Result};
use imageproc::image::{ColorType, DynamicImage, GenericImageView};
use webp::WebPMemory;

use std::borrow::Cow;

use super::ImageFormat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

/// Compress an image to JPEG format with the specified quality
///
/// JPEG has no alpha channel, so it is dropped.
pub fn compress_to_jpeg<W>(img: &DynamicImage, writer: &mut W, quality: u8) -> Result<()>
where
    W: std::io::Write,
{
    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(img),
        ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            Cow::Owned(DynamicImage::from(img.to_luma8()))
        }
        _ => Cow::Owned(DynamicImage::from(img.to_rgb8())),
    };

    let mut encoder =
        imageproc::image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);

    // encode_image would widen L8 to RGB, so hand over the raw buffer
    encoder
        .encode(
            img.as_bytes(),
            img.width(),
            img.height(),
            img.color().into(),
        )
        .with_context(|| "Failed to compress image to JPEG")?;

    Ok(())
}

/// Compress an image to PNG format with the specified compression level
pub fn compress_to_png<W>(
    img: &DynamicImage,
    writer: &mut W,
    compression: PngCompression,
) -> Result<()>
where
    W: std::io::Write,
{
    use imageproc::image::codecs::png::{CompressionType, FilterType, PngEncoder};
    use imageproc::image::ImageEncoder;

    let compression_type = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };

    let encoder = PngEncoder::new_with_quality(writer, compression_type, FilterType::Adaptive);

    encoder
        .write_image(
            img.as_bytes(),
            img.width(),
            img.height(),
            img.color().into(),
        )
        .with_context(|| "Failed to compress image to PNG")?;

    Ok(())
}

/// Compress an image to WebP format with the specified quality
pub fn compress_to_webp(img: &DynamicImage, quality: u8) -> Result<WebPMemory> {
    // the webp encoder only takes 8-bit RGB or RGBA
    let img = if img.color().has_alpha() {
        DynamicImage::from(img.to_rgba8())
    } else {
        DynamicImage::from(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&img)
        .map_err(|e| anyhow::anyhow!("Failed to create WebP encoder: {}", e))?;
    let webp_data = encoder.encode(quality as f32);
    Ok(webp_data)
}

/// Encode into an in-memory buffer
pub fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::with_capacity(width as usize * height as usize);

    match format {
        ImageFormat::Jpeg { quality } => compress_to_jpeg(img, &mut buffer, quality)?,
        ImageFormat::Png { compression } => compress_to_png(img, &mut buffer, compression)?,
        ImageFormat::WebP { quality } => {
            let webp_data = compress_to_webp(img, quality)?;
            buffer.extend_from_slice(&webp_data);
        }
    }

    log::trace!(
        "Encoded {width}x{height} as {} ({} bytes)",
        format.extension(),
        buffer.len()
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::{load_from_memory, GrayImage, Luma, Rgba, RgbaImage};

    fn translucent() -> DynamicImage {
        DynamicImage::from(RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 100])))
    }

    #[test]
    fn png_keeps_alpha() {
        let bytes = encode(
            &translucent(),
            ImageFormat::Png {
                compression: PngCompression::Fast,
            },
        )
        .unwrap();

        let decoded = load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (8, 4));
        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert_eq!(decoded.get_pixel(3, 2), Rgba([10, 20, 30, 100]));
    }

    #[test]
    fn png_keeps_grayscale() {
        let gray = DynamicImage::from(GrayImage::from_fn(6, 6, |x, _| Luma([x as u8 * 40])));
        let bytes = encode(
            &gray,
            ImageFormat::Png {
                compression: PngCompression::Best,
            },
        )
        .unwrap();

        let decoded = load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), ColorType::L8);
        assert_eq!(decoded.to_luma8().get_pixel(5, 0), &Luma([200]));
    }

    #[test]
    fn jpeg_keeps_grayscale() {
        let gray = DynamicImage::from(GrayImage::from_pixel(20, 20, Luma([90])));
        let bytes = encode(&gray, ImageFormat::Jpeg { quality: 85 }).unwrap();

        let decoded = load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (20, 20));
        assert_eq!(decoded.color(), ColorType::L8);
    }

    #[test]
    fn jpeg_drops_alpha() {
        let bytes = encode(&translucent(), ImageFormat::Jpeg { quality: 80 }).unwrap();

        let decoded = load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (8, 4));
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn webp_has_riff_header() {
        let bytes = encode(&translucent(), ImageFormat::WebP { quality: 80 }).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }
}
