//! 生成参数的领域类型

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// 生成的码类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CodeKind {
    Barcode,
    Qrcode,
}

/// 支持的一维码类型（表单 / API 中的 barcode_type 取值）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Symbology {
    Code128,
    Code39,
    Ean,
    Ean13,
    Ean8,
    Upc,
    Upca,
    Isbn,
    Isbn10,
    Isbn13,
    Issn,
    Itf,
    Gs1,
    #[strum(to_string = "gs1_128")]
    #[serde(rename = "gs1_128")]
    Gs1128,
    Codabar,
    Pzn,
    Jan,
    Ean14,
    Gtin,
}

impl Symbology {
    /// 逗号分隔的全部可选值，用于错误提示
    pub fn allowed_list() -> String {
        Self::iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// 输出图片格式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// 二维码纠错等级
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// `#RRGGBB` 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor { r: 0, g: 0, b: 0 };
    pub const WHITE: HexColor = HexColor {
        r: 255,
        g: 255,
        b: 255,
    };

    /// 严格解析 `^#[0-9A-Fa-f]{6}$`
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// 经过校验的一维码参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeParams {
    pub text: String,
    pub symbology: Symbology,
    pub format: ImageFormat,
}

/// 经过校验的二维码参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrParams {
    pub text: String,
    pub format: ImageFormat,
    pub options: QrOptions,
}

/// 二维码渲染选项，同时作为审计日志的 qr_options 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QrOptions {
    pub fill_color: HexColor,
    pub back_color: HexColor,
    pub box_size: u32,
    pub border: u32,
    pub error_correction: EcLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            fill_color: HexColor::BLACK,
            back_color: HexColor::WHITE,
            box_size: 10,
            border: 4,
            error_correction: EcLevel::M,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbology_parse_is_case_insensitive() {
        assert_eq!("CODE128".parse::<Symbology>(), Ok(Symbology::Code128));
        assert_eq!("gs1_128".parse::<Symbology>(), Ok(Symbology::Gs1128));
        assert_eq!("Ean13".parse::<Symbology>(), Ok(Symbology::Ean13));
        assert!("gs1128".parse::<Symbology>().is_err());
        assert!("qr".parse::<Symbology>().is_err());
    }

    #[test]
    fn test_ec_level_parse() {
        assert_eq!("h".parse::<EcLevel>(), Ok(EcLevel::H));
        assert_eq!("Q".parse::<EcLevel>(), Ok(EcLevel::Q));
        assert!("X".parse::<EcLevel>().is_err());
    }

    #[test]
    fn test_allowed_list_contains_every_symbology() {
        let list = Symbology::allowed_list();
        assert!(list.starts_with("code128, code39"));
        assert!(list.contains("gs1_128"));
        assert!(list.ends_with("gtin"));
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!("png".parse::<ImageFormat>(), Ok(ImageFormat::Png));
        assert_eq!("Jpeg".parse::<ImageFormat>(), Ok(ImageFormat::Jpeg));
        assert_eq!("WEBP".parse::<ImageFormat>(), Ok(ImageFormat::Webp));
        assert!("jpg".parse::<ImageFormat>().is_err());
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_hex_color_parse() {
        assert_eq!(
            HexColor::parse("#FF8000"),
            Some(HexColor { r: 255, g: 128, b: 0 })
        );
        assert_eq!(HexColor::parse("#ff8000").map(|c| c.to_hex()), Some("#FF8000".into()));
        assert_eq!(HexColor::parse("red"), None);
        assert_eq!(HexColor::parse("#FFF"), None);
        assert_eq!(HexColor::parse("FF8000"), None);
        assert_eq!(HexColor::parse("#GG0000"), None);
        assert_eq!(HexColor::parse("#FF80001"), None);
    }

    #[test]
    fn test_qr_options_serialize() {
        let json = serde_json::to_value(QrOptions::default()).unwrap();
        assert_eq!(json["fill_color"], "#000000");
        assert_eq!(json["back_color"], "#FFFFFF");
        assert_eq!(json["box_size"], 10);
        assert_eq!(json["border"], 4);
        assert_eq!(json["error_correction"], "M");
    }
}
