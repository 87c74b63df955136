//! 编码适配层
//!
//! 一维码交给 barcoders，二维码交给 qrcode，统一由 [`raster`] 输出图片字节。

pub mod barcode;
pub mod qr;
pub mod raster;
pub mod symbology;

use std::fmt;

pub use barcode::encode_barcode;
pub use qr::encode_qr;

/// 编码失败（容量超限、字符集不符、校验位错误、图片编码失败等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    pub reason: String,
}

impl EncodingError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for EncodingError {}
