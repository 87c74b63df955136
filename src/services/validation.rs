//! 请求参数校验
//!
//! 把原始字符串字段（可能缺失）转换为 [`BarcodeParams`] / [`QrParams`]。
//! 纯函数，没有副作用；页面表单和 JSON API 共用同一套规则。

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use super::types::{
    BarcodeParams, EcLevel, HexColor, ImageFormat, QrOptions, QrParams, Symbology,
};

pub const BOX_SIZE_RANGE: RangeInclusive<i64> = 1..=50;
pub const BORDER_RANGE: RangeInclusive<i64> = 0..=20;

/// 校验失败的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationKind {
    MissingField,
    InvalidEnum,
    InvalidType,
    OutOfRange,
    InvalidFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationKind,
    /// 出错的字段名（API 命名，不带 qr_ 前缀）
    pub field: &'static str,
    pub message: String,
    /// 原样回显的提交值
    pub provided: Option<String>,
}

impl ValidationError {
    pub fn new(
        kind: ValidationKind,
        field: &'static str,
        message: impl Into<String>,
        provided: Option<String>,
    ) -> Self {
        Self {
            kind,
            field,
            message: message.into(),
            provided,
        }
    }

    /// 简短摘要，作为 JSON 错误的 `error` 字段
    pub fn summary(&self) -> String {
        match self.kind {
            ValidationKind::MissingField => format!("Missing required parameter: {}", self.field),
            _ => format!("Invalid {}", self.field),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary(), self.message)
    }
}

impl std::error::Error for ValidationError {}

/// 一维码请求的原始字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBarcodeRequest {
    pub text: Option<String>,
    pub barcode_type: Option<String>,
    pub image_format: Option<String>,
}

/// 二维码请求的原始字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQrRequest {
    pub text: Option<String>,
    pub error_correction: Option<String>,
    pub image_format: Option<String>,
    pub fill_color: Option<String>,
    pub back_color: Option<String>,
    pub box_size: Option<String>,
    pub border: Option<String>,
}

/// 校验一维码请求
///
/// 顺序：text → barcode_type → image_format，返回第一个失败项。
pub fn validate_barcode(raw: &RawBarcodeRequest) -> Result<BarcodeParams, ValidationError> {
    let text = require_text(raw.text.as_deref())?;

    let symbology = match present(raw.barcode_type.as_deref()) {
        None => Symbology::Code128,
        Some(value) => value.parse().map_err(|_| {
            ValidationError::new(
                ValidationKind::InvalidEnum,
                "barcode_type",
                format!("Supported types: {}", Symbology::allowed_list()),
                Some(value.to_string()),
            )
        })?,
    };

    let format = parse_format(raw.image_format.as_deref())?;

    Ok(BarcodeParams {
        text,
        symbology,
        format,
    })
}

/// 校验二维码请求
pub fn validate_qr(raw: &RawQrRequest) -> Result<QrParams, ValidationError> {
    let text = require_text(raw.text.as_deref())?;
    let defaults = QrOptions::default();

    let error_correction = match present(raw.error_correction.as_deref()) {
        None => defaults.error_correction,
        Some(value) => value.parse::<EcLevel>().map_err(|_| {
            ValidationError::new(
                ValidationKind::InvalidEnum,
                "error_correction",
                "Error correction must be one of: L, M, Q, H",
                Some(value.to_string()),
            )
        })?,
    };

    let format = parse_format(raw.image_format.as_deref())?;
    let fill_color = parse_color("fill_color", raw.fill_color.as_deref(), defaults.fill_color)?;
    let back_color = parse_color("back_color", raw.back_color.as_deref(), defaults.back_color)?;
    let box_size = parse_bounded(
        "box_size",
        raw.box_size.as_deref(),
        BOX_SIZE_RANGE,
        defaults.box_size,
    )?;
    let border = parse_bounded("border", raw.border.as_deref(), BORDER_RANGE, defaults.border)?;

    Ok(QrParams {
        text,
        format,
        options: QrOptions {
            fill_color,
            back_color,
            box_size,
            border,
            error_correction,
        },
    })
}

/// 去掉空白后为空视为未提供
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_text(value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::new(
            ValidationKind::MissingField,
            "text",
            "The 'text' parameter must be a non-empty string",
            value.map(String::from),
        )),
    }
}

fn parse_format(value: Option<&str>) -> Result<ImageFormat, ValidationError> {
    match present(value) {
        None => Ok(ImageFormat::Png),
        Some(v) => v.parse().map_err(|_| {
            ValidationError::new(
                ValidationKind::InvalidEnum,
                "image_format",
                "Image format must be one of: PNG, JPEG, WEBP",
                Some(v.to_string()),
            )
        }),
    }
}

fn parse_color(
    field: &'static str,
    value: Option<&str>,
    default: HexColor,
) -> Result<HexColor, ValidationError> {
    // 颜色按原值匹配，不去空白
    match value.filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => HexColor::parse(v).ok_or_else(|| {
            ValidationError::new(
                ValidationKind::InvalidFormat,
                field,
                "Color must be a hex value like #000000",
                Some(v.to_string()),
            )
        }),
    }
}

fn parse_bounded(
    field: &'static str,
    value: Option<&str>,
    range: RangeInclusive<i64>,
    default: u32,
) -> Result<u32, ValidationError> {
    let Some(v) = present(value) else {
        return Ok(default);
    };

    let number: i64 = v.parse().map_err(|_| {
        ValidationError::new(
            ValidationKind::InvalidType,
            field,
            format!("{} must be an integer", field),
            Some(v.to_string()),
        )
    })?;

    if !range.contains(&number) {
        return Err(ValidationError::new(
            ValidationKind::OutOfRange,
            field,
            format!(
                "{} must be between {} and {}",
                field,
                range.start(),
                range.end()
            ),
            Some(v.to_string()),
        ));
    }

    // range 已保证非负且不超过 50
    Ok(number as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr(text: &str) -> RawQrRequest {
        RawQrRequest {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_barcode_defaults() {
        let params = validate_barcode(&RawBarcodeRequest {
            text: Some("HELLO123".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.symbology, Symbology::Code128);
        assert_eq!(params.format, ImageFormat::Png);
        assert_eq!(params.text, "HELLO123");
    }

    #[test]
    fn test_barcode_missing_text() {
        for text in [None, Some(""), Some("   ")] {
            let err = validate_barcode(&RawBarcodeRequest {
                text: text.map(String::from),
                barcode_type: Some("code128".into()),
                image_format: None,
            })
            .unwrap_err();
            assert_eq!(err.kind, ValidationKind::MissingField);
            assert_eq!(err.summary(), "Missing required parameter: text");
        }
    }

    #[test]
    fn test_barcode_text_is_not_trimmed_when_valid() {
        let params = validate_barcode(&RawBarcodeRequest {
            text: Some(" AB ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.text, " AB ");
    }

    #[test]
    fn test_barcode_invalid_symbology() {
        let err = validate_barcode(&RawBarcodeRequest {
            text: Some("123".into()),
            barcode_type: Some("qr".into()),
            image_format: None,
        })
        .unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidEnum);
        assert_eq!(err.field, "barcode_type");
        assert_eq!(err.provided.as_deref(), Some("qr"));
        assert!(err.message.contains("code128"));
    }

    #[test]
    fn test_barcode_invalid_format() {
        let err = validate_barcode(&RawBarcodeRequest {
            text: Some("123".into()),
            barcode_type: None,
            image_format: Some("gif".into()),
        })
        .unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidEnum);
        assert_eq!(err.summary(), "Invalid image_format");
    }

    #[test]
    fn test_qr_defaults() {
        let params = validate_qr(&qr("hi")).unwrap();
        assert_eq!(params.options, QrOptions::default());
        assert_eq!(params.format, ImageFormat::Png);
    }

    #[test]
    fn test_qr_color_is_not_trimmed() {
        let mut raw = qr("hi");
        raw.back_color = Some(" #FFFFFF ".into());
        let err = validate_qr(&raw).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidFormat);
        assert_eq!(err.field, "back_color");
        assert_eq!(err.provided.as_deref(), Some(" #FFFFFF "));

        let mut raw = qr("hi");
        raw.fill_color = Some(String::new());
        assert_eq!(validate_qr(&raw).unwrap().options.fill_color, HexColor::BLACK);
    }

    #[test]
    fn test_qr_invalid_fill_color() {
        let mut raw = qr("hi");
        raw.fill_color = Some("red".into());
        let err = validate_qr(&raw).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidFormat);
        assert_eq!(err.summary(), "Invalid fill_color");
        assert_eq!(err.provided.as_deref(), Some("red"));
    }

    #[test]
    fn test_qr_error_correction() {
        let mut raw = qr("hi");
        raw.error_correction = Some("h".into());
        assert_eq!(
            validate_qr(&raw).unwrap().options.error_correction,
            EcLevel::H
        );

        raw.error_correction = Some("X".into());
        let err = validate_qr(&raw).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidEnum);
        assert_eq!(err.field, "error_correction");
    }

    #[test]
    fn test_box_size_boundaries() {
        for (value, ok) in [("1", true), ("50", true), ("0", false), ("51", false)] {
            let mut raw = qr("hi");
            raw.box_size = Some(value.into());
            match validate_qr(&raw) {
                Ok(params) => {
                    assert!(ok, "box_size={} should fail", value);
                    assert_eq!(params.options.box_size.to_string(), value);
                }
                Err(err) => {
                    assert!(!ok, "box_size={} should pass", value);
                    assert_eq!(err.kind, ValidationKind::OutOfRange);
                }
            }
        }
    }

    #[test]
    fn test_border_boundaries() {
        for (value, ok) in [("0", true), ("20", true), ("-1", false), ("21", false)] {
            let mut raw = qr("hi");
            raw.border = Some(value.into());
            let result = validate_qr(&raw);
            assert_eq!(result.is_ok(), ok, "border={}", value);
            if let Err(err) = result {
                assert_eq!(err.kind, ValidationKind::OutOfRange);
            }
        }
    }

    #[test]
    fn test_non_numeric_box_size() {
        let mut raw = qr("hi");
        raw.box_size = Some("big".into());
        let err = validate_qr(&raw).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidType);
        assert_eq!(err.field, "box_size");

        raw.box_size = Some("2.5".into());
        assert_eq!(
            validate_qr(&raw).unwrap_err().kind,
            ValidationKind::InvalidType
        );
    }

    #[test]
    fn test_text_checked_before_other_fields() {
        let raw = RawQrRequest {
            text: Some(String::new()),
            fill_color: Some("red".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_qr(&raw).unwrap_err().kind,
            ValidationKind::MissingField
        );
    }
}
