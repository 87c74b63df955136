//! Produced QR images decode back to the submitted text

use codemint::services::{EcLevel, HexColor, ImageFormat, QrOptions, QrParams};
use codemint::services::encoder::encode_qr;

fn decode(png: &[u8]) -> String {
    let img = image::load_from_memory(png).unwrap().to_luma8();
    let (width, height) = img.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_, content) = grids[0].decode().unwrap();
    content
}

fn params(text: &str, options: QrOptions) -> QrParams {
    QrParams {
        text: text.to_string(),
        format: ImageFormat::Png,
        options,
    }
}

#[test]
fn test_roundtrip_default_options() {
    let text = "https://example.com/path?q=1";
    let png = encode_qr(&params(text, QrOptions::default())).unwrap();
    assert_eq!(decode(&png), text);
}

#[test]
fn test_roundtrip_custom_rendering() {
    let text = "codemint 二维码 test";
    let cases = [(3, 4, EcLevel::L), (7, 8, EcLevel::H), (12, 2, EcLevel::Q)];
    for (box_size, border, error_correction) in cases {
        let options = QrOptions {
            fill_color: HexColor::parse("#1A237E").unwrap(),
            back_color: HexColor::parse("#FFF8E1").unwrap(),
            box_size,
            border,
            error_correction,
        };
        let png = encode_qr(&params(text, options)).unwrap();
        assert_eq!(decode(&png), text, "box_size={} border={}", box_size, border);
    }
}

#[test]
fn test_identical_requests_are_byte_identical() {
    let p = params("same input", QrOptions::default());
    assert_eq!(encode_qr(&p).unwrap(), encode_qr(&p).unwrap());
}
