//! 栅格图编码为 PNG / JPEG / WEBP

use std::io::Cursor;

use image::{DynamicImage, RgbImage, RgbaImage};

use super::EncodingError;
use crate::services::types::{HexColor, ImageFormat};

/// 把 alpha 通道合成到背景色上（JPEG 不支持透明）
pub fn flatten(img: &RgbaImage, background: HexColor) -> RgbImage {
    let bg = [background.r, background.g, background.b];
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |fg: u8, bg: u8| -> u8 {
            ((u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        image::Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])])
    })
}

pub fn encode_image(
    img: RgbaImage,
    format: ImageFormat,
    background: HexColor,
) -> Result<Vec<u8>, EncodingError> {
    let (dynamic, target) = match format {
        ImageFormat::Png => (DynamicImage::ImageRgba8(img), image::ImageFormat::Png),
        ImageFormat::Jpeg => (
            DynamicImage::ImageRgb8(flatten(&img, background)),
            image::ImageFormat::Jpeg,
        ),
        ImageFormat::Webp => (DynamicImage::ImageRgba8(img), image::ImageFormat::WebP),
    };

    let mut buf = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buf, target)
        .map_err(|e| EncodingError::new(format!("{} encoding failed: {}", format, e)))?;
    Ok(buf.into_inner())
}
