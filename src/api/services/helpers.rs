//! 页面和 API 共用的请求处理函数

use std::collections::HashMap;

use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::state::AppState;
use crate::audit::{GenerationAttempt, RequestMeta};
use crate::errors::CodemintError;
use crate::services::{
    CodeKind, CodeRequest, RawBarcodeRequest, RawQrRequest, ValidationError, ValidationKind,
    validate_barcode, validate_qr,
};
use crate::utils::{client_ip, debug_headers};

/// 提交的字段，键为字段名
pub type Fields = HashMap<String, String>;

/// 从 HttpRequest 提取审计需要的请求方信息
pub fn request_meta(req: &HttpRequest) -> RequestMeta {
    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    RequestMeta {
        ip_address: client_ip(req),
        user_agent,
        debug_headers: Some(debug_headers(req)),
    }
}

/// 解析 form-urlencoded 请求体，不会失败
pub fn parse_form(body: &[u8]) -> Fields {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// 解析 API 请求体
///
/// `Content-Type` 含 `json` 时按 JSON 对象解析，数字和布尔值转成字符串，null 视为未提供；
/// 其余按表单解析。
pub fn parse_api_body(req: &HttpRequest, body: &[u8]) -> Result<Fields, ValidationError> {
    let is_json = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("json"));

    if !is_json {
        return Ok(parse_form(body));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationError::new(
            ValidationKind::InvalidFormat,
            "body",
            format!("Request body is not valid JSON: {}", e),
            None,
        )
    })?;

    let Value::Object(map) = value else {
        return Err(ValidationError::new(
            ValidationKind::InvalidType,
            "body",
            "Request body must be a JSON object",
            None,
        ));
    };

    let fields = map
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect();
    Ok(fields)
}

/// 按前缀取出一维码字段（页面表单与 API 字段名相同）
pub fn barcode_fields(fields: &Fields) -> RawBarcodeRequest {
    RawBarcodeRequest {
        text: fields.get("text").cloned(),
        barcode_type: fields.get("barcode_type").cloned(),
        image_format: fields.get("image_format").cloned(),
    }
}

/// 按前缀取出二维码字段，页面表单使用 `qr_` 前缀
pub fn qr_fields(fields: &Fields, prefix: &str) -> RawQrRequest {
    let get = |name: &str| fields.get(&format!("{}{}", prefix, name)).cloned();
    RawQrRequest {
        text: get("text"),
        error_correction: get("error_correction"),
        image_format: get("image_format"),
        fill_color: get("fill_color"),
        back_color: get("back_color"),
        box_size: get("box_size"),
        border: get("border"),
    }
}

/// 校验一维码请求，失败时写入审计日志
pub fn checked_barcode(
    state: &AppState,
    meta: &RequestMeta,
    raw: &RawBarcodeRequest,
) -> Result<CodeRequest, ValidationError> {
    validate_barcode(raw).map(CodeRequest::Barcode).map_err(|e| {
        debug!("Barcode request rejected: {}", e);
        state
            .audit
            .log(GenerationAttempt::rejected_barcode(meta, raw, &e));
        e
    })
}

/// 校验二维码请求，失败时写入审计日志
pub fn checked_qr(
    state: &AppState,
    meta: &RequestMeta,
    raw: &RawQrRequest,
) -> Result<CodeRequest, ValidationError> {
    validate_qr(raw).map(CodeRequest::Qr).map_err(|e| {
        debug!("QR request rejected: {}", e);
        state.audit.log(GenerationAttempt::rejected_qr(meta, raw, &e));
        e
    })
}

/// 在阻塞线程池中编码，并记录成功或失败
pub async fn generate(
    state: &AppState,
    meta: &RequestMeta,
    request: &CodeRequest,
) -> Result<Vec<u8>, CodemintError> {
    let job = request.clone();
    let result = match web::block(move || job.encode()).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(CodemintError::from(e)),
        Err(e) => Err(CodemintError::internal(format!(
            "encoder task failed: {}",
            e
        ))),
    };

    let attempt = GenerationAttempt::from_request(meta, request);
    match &result {
        Ok(bytes) => {
            debug!(
                "Generated {} {} ({} bytes)",
                request.kind().as_ref(),
                request.format(),
                bytes.len()
            );
            state.audit.log(attempt);
        }
        Err(e) => {
            warn!("Failed to generate {}: {}", request.kind().as_ref(), e.message());
            state.audit.log(attempt.with_error(e.message()));
        }
    }
    result
}

/// JSON 错误体
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided: Option<String>,
}

/// 把错误转换为 JSON 响应，状态码来自 [`CodemintError::http_status`]
pub fn api_error_response(kind: CodeKind, err: &CodemintError) -> HttpResponse {
    let body = match err {
        CodemintError::Validation(v) => ApiError {
            error: v.summary(),
            message: v.message.clone(),
            provided: v.provided.clone(),
        },
        other => ApiError {
            error: match kind {
                CodeKind::Barcode => "Failed to generate barcode".to_string(),
                CodeKind::Qrcode => "Failed to generate QR code".to_string(),
            },
            message: other.message().to_string(),
            provided: None,
        },
    };
    HttpResponse::build(err.http_status()).json(body)
}

/// 附件下载头，非 ASCII 文件名额外带 `filename*`
pub fn attachment_disposition(filename: &str) -> ContentDisposition {
    let mut parameters = Vec::with_capacity(2);
    if filename.is_ascii() {
        parameters.push(DispositionParam::Filename(filename.to_string()));
    } else {
        let fallback: String = filename
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        parameters.push(DispositionParam::Filename(fallback));
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: filename.as_bytes().to_vec(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}
