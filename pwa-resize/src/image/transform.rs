//! Lanczos resampling to an exact target size

use anyhow::{Context, Result};
use fast_image_resize as fr;
use fr::images::Image as FrImage;
use imageproc::image::{ColorType, DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::size::Size;

/// 8-bit pixel layout the resampler works in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
}

impl Layout {
    // Wider and float formats narrow to 8 bits per channel
    fn of(img: &DynamicImage) -> Self {
        match img.color() {
            ColorType::L8 | ColorType::L16 => Layout::Luma,
            ColorType::La8 | ColorType::La16 => Layout::LumaAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Layout::Rgb,
            _ => Layout::Rgba,
        }
    }

    fn pixel_type(self) -> fr::PixelType {
        match self {
            Layout::Luma => fr::PixelType::U8,
            Layout::LumaAlpha => fr::PixelType::U8x2,
            Layout::Rgb => fr::PixelType::U8x3,
            Layout::Rgba => fr::PixelType::U8x4,
        }
    }

    fn channels(self) -> usize {
        match self {
            Layout::Luma => 1,
            Layout::LumaAlpha => 2,
            Layout::Rgb => 3,
            Layout::Rgba => 4,
        }
    }

    fn raw(self, img: &DynamicImage) -> Vec<u8> {
        match self {
            Layout::Luma => img.to_luma8().into_raw(),
            Layout::LumaAlpha => img.to_luma_alpha8().into_raw(),
            Layout::Rgb => img.to_rgb8().into_raw(),
            Layout::Rgba => img.to_rgba8().into_raw(),
        }
    }

    fn wrap(self, width: u32, height: u32, buffer: Vec<u8>) -> Option<DynamicImage> {
        match self {
            Layout::Luma => GrayImage::from_raw(width, height, buffer).map(DynamicImage::from),
            Layout::LumaAlpha => {
                GrayAlphaImage::from_raw(width, height, buffer).map(DynamicImage::from)
            }
            Layout::Rgb => RgbImage::from_raw(width, height, buffer).map(DynamicImage::from),
            Layout::Rgba => RgbaImage::from_raw(width, height, buffer).map(DynamicImage::from),
        }
    }
}

/// Resample `img` to exactly `target`, ignoring aspect ratio.
///
/// Alpha layouts are resampled premultiplied so transparent pixels
/// don't bleed their color into opaque neighbours.
pub fn resize(img: &DynamicImage, target: Size) -> Result<DynamicImage> {
    let (width, height) = (img.width(), img.height());
    let (target_width, target_height) = target.dimensions();
    let layout = Layout::of(img);

    log::trace!(
        "Resampling {width}x{height} {:?} to {target_width}x{target_height}",
        layout
    );

    let src_image = FrImage::from_vec_u8(width, height, layout.raw(img), layout.pixel_type())
        .context("Source image buffer is invalid")?;

    let mut dst_buffer =
        vec![0u8; target_width as usize * target_height as usize * layout.channels()];
    {
        let mut dst_image = FrImage::from_slice_u8(
            target_width,
            target_height,
            &mut dst_buffer,
            layout.pixel_type(),
        )
        .context("Destination image buffer is invalid")?;

        // Lanczos3 in both directions
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3))
            .use_alpha(true);

        let mut resizer = fr::Resizer::new();
        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .context("Failed to resample image")?;
    }

    layout
        .wrap(target_width, target_height, dst_buffer)
        .context("Resampled buffer does not match target dimensions")
}
