//! 页面模板
//!
//! `assets/index.html` 通过 rust-embed 嵌入，渲染时替换 `%NAME%` 占位符。
//! 所有回显值都先做 HTML 转义。

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_embed::Embed;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::services::{
    EcLevel, ImageFormat, QrOptions, RawBarcodeRequest, RawQrRequest, Symbology,
};

#[derive(Embed)]
#[folder = "assets/"]
struct PageAssets;

/// 生成结果的内联预览
#[derive(Debug, Clone)]
pub struct Preview {
    pub mime: &'static str,
    pub data: String,
    pub alt: String,
}

impl Preview {
    pub fn new(format: ImageFormat, bytes: &[u8], alt: &str) -> Self {
        Self {
            mime: format.mime_type(),
            data: STANDARD.encode(bytes),
            alt: alt.to_string(),
        }
    }

    /// `data:<mime>;base64,...`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

/// 页面渲染上下文，表单字段原样回显
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub error: Option<String>,
    pub barcode: RawBarcodeRequest,
    pub qr: RawQrRequest,
    pub barcode_image: Option<Preview>,
    pub qr_image: Option<Preview>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn template() -> String {
    match PageAssets::get("index.html") {
        Some(content) => String::from_utf8_lossy(&content.data).into_owned(),
        None => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/index.html")).to_string(),
    }
}

/// 生成 `<option>` 列表，`selected` 按大小写不敏感匹配
fn options<'a>(values: impl Iterator<Item = &'a str>, selected: &str) -> String {
    values
        .map(|v| {
            let mark = if v.eq_ignore_ascii_case(selected.trim()) {
                " selected"
            } else {
                ""
            };
            format!("<option value=\"{0}\"{1}>{0}</option>", escape_html(v), mark)
        })
        .collect()
}

fn echo(value: &Option<String>, default: &str) -> String {
    escape_html(value.as_deref().unwrap_or(default))
}

fn result_block(preview: &Option<Preview>) -> String {
    match preview {
        Some(p) => format!(
            "<div class=\"result\"><img src=\"{}\" alt=\"{}\"></div>",
            p.data_uri(),
            escape_html(&p.alt)
        ),
        None => String::new(),
    }
}

/// 单次扫描替换 `%NAME%`，填入的值不会再被扫描
fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after
            .find('%')
            .and_then(|end| values.get(&after[..end]).map(|v| (end, v)));
        match value {
            Some((end, v)) => {
                out.push_str(v);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_page(ctx: &PageContext) -> String {
    trace!("Rendering index page");
    let defaults = QrOptions::default();

    let banner = match &ctx.error {
        Some(msg) => format!("<div class=\"error\" role=\"alert\">{}</div>", escape_html(msg)),
        None => String::new(),
    };

    let symbologies: Vec<Symbology> = Symbology::iter().collect();
    let formats: Vec<ImageFormat> = ImageFormat::iter().collect();
    let levels: Vec<EcLevel> = EcLevel::iter().collect();

    let barcode_type = ctx.barcode.barcode_type.as_deref().unwrap_or("code128");
    let image_format = ctx.barcode.image_format.as_deref().unwrap_or("PNG");
    let qr_format = ctx.qr.image_format.as_deref().unwrap_or("PNG");
    let qr_level = ctx
        .qr
        .error_correction
        .as_deref()
        .unwrap_or(defaults.error_correction.as_ref());

    let values: HashMap<&str, String> = HashMap::from([
        ("ERROR_BANNER", banner),
        ("TEXT", echo(&ctx.barcode.text, "")),
        (
            "BARCODE_TYPE_OPTIONS",
            options(symbologies.iter().map(|s| s.as_ref()), barcode_type),
        ),
        (
            "IMAGE_FORMAT_OPTIONS",
            options(formats.iter().map(|f| f.as_ref()), image_format),
        ),
        ("BARCODE_RESULT", result_block(&ctx.barcode_image)),
        ("QR_TEXT", echo(&ctx.qr.text, "")),
        (
            "QR_EC_OPTIONS",
            options(levels.iter().map(|l| l.as_ref()), qr_level),
        ),
        (
            "QR_IMAGE_FORMAT_OPTIONS",
            options(formats.iter().map(|f| f.as_ref()), qr_format),
        ),
        (
            "QR_FILL_COLOR",
            echo(&ctx.qr.fill_color, &defaults.fill_color.to_hex()),
        ),
        (
            "QR_BACK_COLOR",
            echo(&ctx.qr.back_color, &defaults.back_color.to_hex()),
        ),
        (
            "QR_BOX_SIZE",
            echo(&ctx.qr.box_size, &defaults.box_size.to_string()),
        ),
        ("QR_BORDER", echo(&ctx.qr.border, &defaults.border.to_string())),
        ("QR_RESULT", result_block(&ctx.qr_image)),
        ("VERSION", env!("CARGO_PKG_VERSION").to_string()),
    ]);

    fill_placeholders(&template(), &values)
}
