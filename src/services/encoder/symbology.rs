//! 一维码载荷规范化
//!
//! 把用户输入整理成底层编码器接受的形式：补全或校验校验位、
//! 选择 Code 128 字符集、ISBN/ISSN 转 EAN-13 等。

use super::EncodingError;
use crate::services::types::Symbology;

/// Code 128 字符集前缀（barcoders 约定）
const CODE128_SET_B: char = 'Ɓ';
const CODE128_SET_C: char = 'Ć';

/// 规范化后的载荷，决定最终使用哪种编码器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// 带字符集前缀
    Code128(String),
    Code39(String),
    /// 完整 13 位（含校验位）
    Ean13(String),
    /// 完整 8 位（含校验位）
    Ean8(String),
    /// 偶数位数字
    Itf(String),
    /// 含起止符
    Codabar(String),
}

/// 文本类码制原样编码，只有纯数字和 ISBN/ISSN/PZN 会去掉首尾空白
pub fn normalize(symbology: Symbology, text: &str) -> Result<Normalized, EncodingError> {
    match symbology {
        Symbology::Code128 => code128(text),
        Symbology::Gs1 | Symbology::Gs1128 => {
            let element: String = text.chars().filter(|c| *c != '(' && *c != ')').collect();
            if element.is_empty() {
                return Err(EncodingError::new("GS1 element string is empty"));
            }
            code128(&element)
        }
        Symbology::Code39 => Ok(Normalized::Code39(text.to_uppercase())),
        Symbology::Ean | Symbology::Ean13 => ean13(text).map(Normalized::Ean13),
        Symbology::Jan => {
            let digits = ean13(text)?;
            if !(digits.starts_with("45") || digits.starts_with("49")) {
                return Err(EncodingError::new("JAN codes must start with 45 or 49"));
            }
            Ok(Normalized::Ean13(digits))
        }
        Symbology::Ean8 => {
            with_gs1_check(&numeric(text, "EAN-8")?, 7, "EAN-8").map(Normalized::Ean8)
        }
        Symbology::Upc | Symbology::Upca => {
            let upc = with_gs1_check(&numeric(text, "UPC-A")?, 11, "UPC-A")?;
            Ok(Normalized::Ean13(format!("0{}", upc)))
        }
        Symbology::Isbn | Symbology::Isbn13 => isbn(text, true).map(Normalized::Ean13),
        Symbology::Isbn10 => isbn(text, false).map(Normalized::Ean13),
        Symbology::Issn => issn(text).map(Normalized::Ean13),
        Symbology::Itf => {
            let digits = numeric(text, "ITF")?;
            if digits.len() % 2 == 1 {
                Ok(Normalized::Itf(format!("0{}", digits)))
            } else {
                Ok(Normalized::Itf(digits))
            }
        }
        Symbology::Ean14 | Symbology::Gtin => {
            with_gs1_check(&numeric(text, "GTIN-14")?, 13, "GTIN-14").map(Normalized::Itf)
        }
        Symbology::Codabar => Ok(Normalized::Codabar(codabar(text))),
        Symbology::Pzn => pzn(text).map(|digits| Normalized::Code39(format!("-{}", digits))),
    }
}

fn code128(text: &str) -> Result<Normalized, EncodingError> {
    if text.is_empty() {
        return Err(EncodingError::new("Code 128 payload is empty"));
    }
    let set = if text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_digit()) {
        CODE128_SET_C
    } else {
        CODE128_SET_B
    };
    Ok(Normalized::Code128(format!("{}{}", set, text)))
}

fn numeric(text: &str, name: &str) -> Result<String, EncodingError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::new(format!(
            "{} payload must contain digits only",
            name
        )));
    }
    Ok(text.to_string())
}

fn digit_values(digits: &str) -> impl DoubleEndedIterator<Item = u32> + '_ {
    digits.bytes().map(|b| u32::from(b - b'0'))
}

/// GS1 mod-10 校验位（EAN/UPC/GTIN 通用）
pub fn gs1_check_digit(body: &str) -> char {
    let sum: u32 = digit_values(body)
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();
    char::from(b'0' + ((10 - sum % 10) % 10) as u8)
}

/// `len` 位时补校验位，`len + 1` 位时校验最后一位
fn with_gs1_check(digits: &str, len: usize, name: &str) -> Result<String, EncodingError> {
    if digits.len() == len {
        return Ok(format!("{}{}", digits, gs1_check_digit(digits)));
    }
    if digits.len() == len + 1 {
        let (body, check) = digits.split_at(len);
        let expected = gs1_check_digit(body);
        if check.starts_with(expected) {
            return Ok(digits.to_string());
        }
        return Err(EncodingError::new(format!(
            "{} check digit mismatch: expected {}, got {}",
            name, expected, check
        )));
    }
    Err(EncodingError::new(format!(
        "{} requires {} or {} digits, got {}",
        name,
        len,
        len + 1,
        digits.len()
    )))
}

fn ean13(text: &str) -> Result<String, EncodingError> {
    with_gs1_check(&numeric(text, "EAN-13")?, 12, "EAN-13")
}

/// 去掉连字符和空格
fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// ISBN 转为 13 位 EAN
fn isbn(text: &str, allow_13: bool) -> Result<String, EncodingError> {
    let cleaned = compact(text);
    match cleaned.len() {
        13 if allow_13 => {
            if !(cleaned.starts_with("978") || cleaned.starts_with("979")) {
                return Err(EncodingError::new("ISBN-13 must start with 978 or 979"));
            }
            with_gs1_check(&numeric(&cleaned, "ISBN-13")?, 12, "ISBN-13")
        }
        10 => {
            let (body, check) = cleaned.split_at(9);
            numeric(body, "ISBN-10")?;
            let expected = isbn10_check_digit(body);
            if !check.starts_with(expected) {
                return Err(EncodingError::new(format!(
                    "ISBN-10 check digit mismatch: expected {}, got {}",
                    expected, check
                )));
            }
            let ean_body = format!("978{}", body);
            Ok(format!("{}{}", ean_body, gs1_check_digit(&ean_body)))
        }
        n => Err(EncodingError::new(format!(
            "ISBN must have {} characters, got {}",
            if allow_13 { "10 or 13" } else { "10" },
            n
        ))),
    }
}

/// 加权 10..2 的 mod-11 校验，10 记作 X
fn isbn10_check_digit(body: &str) -> char {
    let sum: u32 = digit_values(body)
        .enumerate()
        .map(|(i, d)| d * (10 - i as u32))
        .sum();
    mod11_char(sum)
}

/// 加权 8..2 的 mod-11 校验
fn issn_check_digit(body: &str) -> char {
    let sum: u32 = digit_values(body)
        .enumerate()
        .map(|(i, d)| d * (8 - i as u32))
        .sum();
    mod11_char(sum)
}

fn mod11_char(sum: u32) -> char {
    match (11 - sum % 11) % 11 {
        10 => 'X',
        n => char::from(b'0' + n as u8),
    }
}

/// ISSN 转为 977 前缀的 EAN-13
fn issn(text: &str) -> Result<String, EncodingError> {
    let cleaned = compact(text);
    let body = match cleaned.len() {
        7 => cleaned.as_str(),
        8 => {
            let (body, check) = cleaned.split_at(7);
            numeric(body, "ISSN")?;
            let expected = issn_check_digit(body);
            if !check.starts_with(expected) {
                return Err(EncodingError::new(format!(
                    "ISSN check digit mismatch: expected {}, got {}",
                    expected, check
                )));
            }
            body
        }
        n => {
            return Err(EncodingError::new(format!(
                "ISSN must have 7 or 8 characters, got {}",
                n
            )));
        }
    };
    numeric(body, "ISSN")?;
    let ean_body = format!("977{}00", body);
    Ok(format!("{}{}", ean_body, gs1_check_digit(&ean_body)))
}

fn is_codabar_guard(c: char) -> bool {
    matches!(c, 'A'..='D')
}

fn codabar(text: &str) -> String {
    let mut data = text.to_uppercase();
    if !data.starts_with(is_codabar_guard) {
        data.insert(0, 'A');
    }
    let has_stop = data.chars().count() > 1 && data.ends_with(is_codabar_guard);
    if !has_stop {
        data.push('B');
    }
    data
}

/// PZN（7 位，加权 2..7 的 mod-11 校验）
fn pzn(text: &str) -> Result<String, EncodingError> {
    let text = text.trim();
    let cleaned = text.strip_prefix("PZN").unwrap_or(text);
    let cleaned = cleaned.trim_start_matches('-').trim();
    let digits = numeric(cleaned, "PZN")?;

    let check = |body: &str| -> Result<char, EncodingError> {
        let sum: u32 = digit_values(body)
            .enumerate()
            .map(|(i, d)| d * (i as u32 + 2))
            .sum();
        match sum % 11 {
            10 => Err(EncodingError::new(format!(
                "PZN {} has no valid check digit",
                body
            ))),
            n => Ok(char::from(b'0' + n as u8)),
        }
    };

    match digits.len() {
        6 => Ok(format!("{}{}", digits, check(&digits)?)),
        7 => {
            let (body, given) = digits.split_at(6);
            let expected = check(body)?;
            if given.starts_with(expected) {
                Ok(digits)
            } else {
                Err(EncodingError::new(format!(
                    "PZN check digit mismatch: expected {}, got {}",
                    expected, given
                )))
            }
        }
        n => Err(EncodingError::new(format!(
            "PZN requires 6 or 7 digits, got {}",
            n
        ))),
    }
}
