//! Service layer for code generation
//!
//! Validation and encoding shared between the HTML page handlers and the JSON API.

pub mod encoder;
pub mod types;
pub mod validation;

pub use encoder::EncodingError;
pub use types::{
    BarcodeParams, CodeKind, EcLevel, HexColor, ImageFormat, QrOptions, QrParams, Symbology,
};
pub use validation::{
    RawBarcodeRequest, RawQrRequest, ValidationError, ValidationKind, validate_barcode,
    validate_qr,
};

/// 校验通过的生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRequest {
    Barcode(BarcodeParams),
    Qr(QrParams),
}

impl CodeRequest {
    pub fn kind(&self) -> CodeKind {
        match self {
            Self::Barcode(_) => CodeKind::Barcode,
            Self::Qr(_) => CodeKind::Qrcode,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Barcode(p) => &p.text,
            Self::Qr(p) => &p.text,
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Barcode(p) => p.format,
            Self::Qr(p) => p.format,
        }
    }

    /// 编码为图片字节（CPU 密集，调用方应放到阻塞线程池）
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            Self::Barcode(p) => encoder::encode_barcode(p),
            Self::Qr(p) => encoder::encode_qr(p),
        }
    }
}
