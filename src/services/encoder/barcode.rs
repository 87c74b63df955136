//! 一维码编码：规范化 → barcoders 编码 → 栅格化

use barcoders::sym::{codabar::Codabar, code39::Code39, code128::Code128, ean8::EAN8, ean13::EAN13, tf::TF};
use image::{Rgba, RgbaImage};

use super::symbology::{Normalized, normalize};
use super::{EncodingError, raster};
use crate::services::types::{BarcodeParams, HexColor};

/// 每个模块的像素宽度
pub const MODULE_WIDTH: u32 = 2;
/// 条高（像素）
pub const BAR_HEIGHT: u32 = 120;
/// 两侧静区（模块数）
pub const QUIET_ZONE: u32 = 10;

fn encoder_error(name: &str, err: barcoders::error::Error) -> EncodingError {
    EncodingError::new(format!("{} encoding failed: {}", name, err))
}

/// 把规范化载荷编码为模块序列（1 = 条，0 = 空）
pub fn modules(normalized: &Normalized) -> Result<Vec<u8>, EncodingError> {
    let encoded = match normalized {
        Normalized::Code128(data) => Code128::new(data.clone())
            .map_err(|e| encoder_error("Code 128", e))?
            .encode(),
        Normalized::Code39(data) => Code39::new(data.clone())
            .map_err(|e| encoder_error("Code 39", e))?
            .encode(),
        // 校验位由编码器重新计算
        Normalized::Ean13(digits) => EAN13::new(digits[..12].to_string())
            .map_err(|e| encoder_error("EAN-13", e))?
            .encode(),
        Normalized::Ean8(digits) => EAN8::new(digits[..7].to_string())
            .map_err(|e| encoder_error("EAN-8", e))?
            .encode(),
        Normalized::Itf(digits) => TF::interleaved(digits.clone())
            .map_err(|e| encoder_error("ITF", e))?
            .encode(),
        Normalized::Codabar(data) => Codabar::new(data.clone())
            .map_err(|e| encoder_error("Codabar", e))?
            .encode(),
    };

    if encoded.is_empty() {
        return Err(EncodingError::new("encoder produced no modules"));
    }
    Ok(encoded)
}

/// 按默认尺寸绘制模块
pub fn render_modules(modules: &[u8]) -> RgbaImage {
    let total_modules = modules.len() as u32 + QUIET_ZONE * 2;
    let width = total_modules * MODULE_WIDTH;
    let white = Rgba([255, 255, 255, 255]);
    let black = Rgba([0, 0, 0, 255]);

    let mut img = RgbaImage::from_pixel(width, BAR_HEIGHT, white);
    for (i, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }
        let x0 = (QUIET_ZONE + i as u32) * MODULE_WIDTH;
        for x in x0..x0 + MODULE_WIDTH {
            for y in 0..BAR_HEIGHT {
                img.put_pixel(x, y, black);
            }
        }
    }
    img
}

pub fn encode_barcode(params: &BarcodeParams) -> Result<Vec<u8>, EncodingError> {
    let normalized = normalize(params.symbology, &params.text)?;
    let modules = modules(&normalized)?;
    let img = render_modules(&modules);
    raster::encode_image(img, params.format, HexColor::WHITE)
}
