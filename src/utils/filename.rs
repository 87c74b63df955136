//! 下载文件名

use crate::services::{ImageFormat, Symbology};

/// 二维码文件名最多取用的输入字符数
const QR_NAME_MAX_CHARS: usize = 30;

/// `{symbology}_barcode_{text}.{ext}`，路径分隔符和控制字符替换为 `_`
pub fn barcode_filename(symbology: Symbology, text: &str, format: ImageFormat) -> String {
    let safe: String = text
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{}_barcode_{}.{}", symbology, safe, format.extension())
}

/// `qrcode_{sanitized}.{ext}`
///
/// 取前 30 个字符，只保留字母数字、空格、`-`、`_`，去掉末尾空格，为空时使用 `generated`。
pub fn qr_filename(text: &str, format: ImageFormat) -> String {
    let kept: String = text
        .chars()
        .take(QR_NAME_MAX_CHARS)
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();
    let trimmed = kept.trim_end_matches(' ');
    let stem = if trimmed.is_empty() {
        "generated"
    } else {
        trimmed
    };
    format!("qrcode_{}.{}", stem, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_filename() {
        assert_eq!(
            barcode_filename(Symbology::Code128, "HELLO123", ImageFormat::Png),
            "code128_barcode_HELLO123.png"
        );
        assert_eq!(
            barcode_filename(Symbology::Gs1128, "a/b\\c\nd", ImageFormat::Jpeg),
            "gs1_128_barcode_a_b_c_d.jpeg"
        );
    }

    #[test]
    fn test_qr_filename_sanitizes() {
        assert_eq!(
            qr_filename("https://example.com/a?b=c", ImageFormat::Webp),
            "qrcode_httpsexamplecomabc.webp"
        );
        assert_eq!(qr_filename("hello world  ", ImageFormat::Png), "qrcode_hello world.png");
        assert_eq!(qr_filename("!!!", ImageFormat::Png), "qrcode_generated.png");
    }

    #[test]
    fn test_qr_filename_uses_first_30_chars() {
        let text = "a".repeat(40);
        assert_eq!(qr_filename(&text, ImageFormat::Png), format!("qrcode_{}.png", "a".repeat(30)));
    }
}
