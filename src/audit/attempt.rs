use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::services::{
    CodeKind, CodeRequest, RawBarcodeRequest, RawQrRequest, ValidationError,
};

/// 与 generation_logs 列宽一致的截断长度
const IP_MAX_CHARS: usize = 64;
const BARCODE_TYPE_MAX_CHARS: usize = 32;
const IMAGE_FORMAT_MAX_CHARS: usize = 16;

/// 请求方信息，由 HTTP 层提取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip_address: String,
    pub user_agent: Option<String>,
    /// 请求头快照 JSON
    pub debug_headers: Option<String>,
}

impl RequestMeta {
    pub fn unknown() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            user_agent: None,
            debug_headers: None,
        }
    }
}

/// 一次生成尝试（成功或失败）
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAttempt {
    pub ip_address: String,
    pub code_type: CodeKind,
    pub barcode_type: Option<String>,
    pub code_value: String,
    pub image_format: String,
    /// QR 选项 JSON
    pub qr_options: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub debug_headers: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

fn clip(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

impl GenerationAttempt {
    fn base(meta: &RequestMeta, code_type: CodeKind, code_value: String) -> Self {
        Self {
            ip_address: clip(&meta.ip_address, IP_MAX_CHARS),
            code_type,
            barcode_type: None,
            code_value,
            image_format: String::new(),
            qr_options: None,
            created_at: Utc::now(),
            user_agent: meta.user_agent.clone(),
            debug_headers: meta.debug_headers.clone(),
            success: true,
            error_message: None,
        }
    }

    /// 校验通过的请求，默认记为成功
    pub fn from_request(meta: &RequestMeta, request: &CodeRequest) -> Self {
        let mut attempt = Self::base(meta, request.kind(), request.text().to_string());
        attempt.image_format = request.format().to_string();
        match request {
            CodeRequest::Barcode(params) => {
                attempt.barcode_type = Some(params.symbology.to_string());
            }
            CodeRequest::Qr(params) => {
                attempt.qr_options = serde_json::to_string(&params.options).ok();
            }
        }
        attempt
    }

    /// 标记为失败
    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        self.success = false;
        self.error_message = Some(error.to_string());
        self
    }

    /// 一维码参数校验失败
    pub fn rejected_barcode(
        meta: &RequestMeta,
        raw: &RawBarcodeRequest,
        error: &ValidationError,
    ) -> Self {
        let mut attempt = Self::base(
            meta,
            CodeKind::Barcode,
            raw.text.clone().unwrap_or_default(),
        );
        attempt.barcode_type = raw
            .barcode_type
            .as_deref()
            .map(|v| clip(v, BARCODE_TYPE_MAX_CHARS));
        attempt.image_format = raw_format(raw.image_format.as_deref());
        attempt.with_error(error)
    }

    /// 二维码参数校验失败，qr_options 记录提交的原始值
    pub fn rejected_qr(meta: &RequestMeta, raw: &RawQrRequest, error: &ValidationError) -> Self {
        let mut attempt = Self::base(meta, CodeKind::Qrcode, raw.text.clone().unwrap_or_default());
        attempt.image_format = raw_format(raw.image_format.as_deref());

        let mut submitted = Map::new();
        for (key, value) in [
            ("fill_color", &raw.fill_color),
            ("back_color", &raw.back_color),
            ("box_size", &raw.box_size),
            ("border", &raw.border),
            ("error_correction", &raw.error_correction),
        ] {
            if let Some(v) = value {
                submitted.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        if !submitted.is_empty() {
            attempt.qr_options = Some(Value::Object(submitted).to_string());
        }
        attempt.with_error(error)
    }
}

/// 原始格式值（截断），未提供时按默认 PNG 记录
fn raw_format(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => clip(v, IMAGE_FORMAT_MAX_CHARS),
        None => "PNG".to_string(),
    }
}
