//! 二维码编码

use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

use super::{EncodingError, raster};
use crate::services::types::{HexColor, QrOptions, QrParams};

fn rgba(color: HexColor) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// 生成模块矩阵并按 box_size / border 绘制
///
/// 版本从 1 开始自动增长到能容纳数据为止。
pub fn render(text: &str, options: &QrOptions) -> Result<RgbaImage, EncodingError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())
        .map_err(|e| EncodingError::new(format!("QR encoding failed: {}", e)))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let scale = options.box_size;
    let size = (width + options.border * 2) * scale;

    let fill = rgba(options.fill_color);
    let mut img = RgbaImage::from_pixel(size, size, rgba(options.back_color));

    for (idx, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = idx as u32 % width;
        let my = idx as u32 / width;
        let x0 = (mx + options.border) * scale;
        let y0 = (my + options.border) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x0 + dx, y0 + dy, fill);
            }
        }
    }

    Ok(img)
}

pub fn encode_qr(params: &QrParams) -> Result<Vec<u8>, EncodingError> {
    let img = render(&params.text, &params.options)?;
    raster::encode_image(img, params.format, params.options.back_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::types::EcLevel;

    #[test]
    fn test_version_one_dimensions() {
        let options = QrOptions {
            box_size: 1,
            border: 0,
            ..Default::default()
        };
        let img = render("hi", &options).unwrap();
        // 版本 1 为 21x21
        assert_eq!(img.dimensions(), (21, 21));
    }

    #[test]
    fn test_border_and_colors() {
        let options = QrOptions {
            fill_color: HexColor { r: 200, g: 0, b: 0 },
            back_color: HexColor { r: 0, g: 0, b: 200 },
            box_size: 3,
            border: 2,
            error_correction: EcLevel::L,
        };
        let img = render("hi", &options).unwrap();
        assert_eq!(img.dimensions(), ((21 + 4) * 3, (21 + 4) * 3));
        // 边框使用背景色，定位图形左上角为前景色
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 200, 255]);
        assert_eq!(img.get_pixel(6, 6).0, [200, 0, 0, 255]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let text = "x".repeat(4000);
        let options = QrOptions {
            error_correction: EcLevel::H,
            ..Default::default()
        };
        let err = render(&text, &options).unwrap_err();
        assert!(err.reason.starts_with("QR encoding failed"));
    }
}
