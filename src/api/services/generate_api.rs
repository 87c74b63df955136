//! JSON / 表单 API
//!
//! 成功返回原始图片字节，失败返回 `{error, message, provided?}`，不会返回 HTML。

use actix_web::{HttpRequest, HttpResponse, web};

use super::helpers::{
    api_error_response, barcode_fields, checked_barcode, checked_qr, generate, parse_api_body,
    qr_fields, request_meta,
};
use super::state::AppState;
use crate::audit::GenerationAttempt;
use crate::errors::CodemintError;
use crate::services::{CodeKind, RawBarcodeRequest, RawQrRequest};

pub struct GenerateApiService;

fn image_response(format_mime: &'static str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok().content_type(format_mime).body(bytes)
}

impl GenerateApiService {
    pub async fn barcode(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        let meta = request_meta(&req);
        let fields = match parse_api_body(&req, &body) {
            Ok(fields) => fields,
            Err(e) => {
                state.audit.log(GenerationAttempt::rejected_barcode(
                    &meta,
                    &RawBarcodeRequest::default(),
                    &e,
                ));
                return api_error_response(CodeKind::Barcode, &CodemintError::from(e));
            }
        };

        let raw = barcode_fields(&fields);
        let request = match checked_barcode(&state, &meta, &raw) {
            Ok(request) => request,
            Err(e) => return api_error_response(CodeKind::Barcode, &CodemintError::from(e)),
        };

        match generate(&state, &meta, &request).await {
            Ok(bytes) => image_response(request.format().mime_type(), bytes),
            Err(e) => api_error_response(CodeKind::Barcode, &e),
        }
    }

    pub async fn qrcode(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        let meta = request_meta(&req);
        let fields = match parse_api_body(&req, &body) {
            Ok(fields) => fields,
            Err(e) => {
                state.audit.log(GenerationAttempt::rejected_qr(
                    &meta,
                    &RawQrRequest::default(),
                    &e,
                ));
                return api_error_response(CodeKind::Qrcode, &CodemintError::from(e));
            }
        };

        let raw = qr_fields(&fields, "");
        let request = match checked_qr(&state, &meta, &raw) {
            Ok(request) => request,
            Err(e) => return api_error_response(CodeKind::Qrcode, &CodemintError::from(e)),
        };

        match generate(&state, &meta, &request).await {
            Ok(bytes) => image_response(request.format().mime_type(), bytes),
            Err(e) => api_error_response(CodeKind::Qrcode, &e),
        }
    }
}

pub fn generate_api_routes() -> actix_web::Scope {
    web::scope("")
        .route("/barcode", web::post().to(GenerateApiService::barcode))
        .route("/qrcode", web::post().to(GenerateApiService::qrcode))
}
