//! 表单页面
//!
//! 成功时内联预览或返回附件；任何失败都以 200 重新渲染页面，显示错误并回显提交的值。

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::trace;

use super::helpers::{
    attachment_disposition, barcode_fields, checked_barcode, checked_qr, generate, parse_form,
    qr_fields, request_meta,
};
use super::state::AppState;
use super::templates::{PageContext, Preview, render_page};
use crate::services::{CodeRequest, ValidationError, ValidationKind};
use crate::utils::{barcode_filename, qr_filename};

const EMPTY_BARCODE_TEXT: &str = "Please enter text to generate barcode";
const EMPTY_QR_TEXT: &str = "Please enter text to generate QR code";

/// 成功后的输出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Inline,
    Attachment,
}

fn page(ctx: &PageContext) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(ctx))
}

fn validation_banner(err: &ValidationError, empty_text: &str) -> String {
    match err.kind {
        ValidationKind::MissingField => empty_text.to_string(),
        _ => err.to_string(),
    }
}

fn attachment(request: &CodeRequest, bytes: Vec<u8>) -> HttpResponse {
    let filename = match request {
        CodeRequest::Barcode(p) => barcode_filename(p.symbology, &p.text, p.format),
        CodeRequest::Qr(p) => qr_filename(&p.text, p.format),
    };
    HttpResponse::Ok()
        .content_type(request.format().mime_type())
        .insert_header(attachment_disposition(&filename))
        .body(bytes)
}

pub struct PageService;

impl PageService {
    pub async fn index() -> impl Responder {
        trace!("Serving index page");
        page(&PageContext::default())
    }

    pub async fn generate_barcode(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        Self::barcode(req, body, state, Delivery::Inline).await
    }

    pub async fn download_barcode(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        Self::barcode(req, body, state, Delivery::Attachment).await
    }

    pub async fn generate_qr(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        Self::qr(req, body, state, Delivery::Inline).await
    }

    pub async fn download_qr(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
    ) -> HttpResponse {
        Self::qr(req, body, state, Delivery::Attachment).await
    }

    async fn barcode(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
        delivery: Delivery,
    ) -> HttpResponse {
        let meta = request_meta(&req);
        let raw = barcode_fields(&parse_form(&body));
        let mut ctx = PageContext {
            barcode: raw.clone(),
            ..Default::default()
        };

        let request = match checked_barcode(&state, &meta, &raw) {
            Ok(request) => request,
            Err(e) => {
                ctx.error = Some(validation_banner(&e, EMPTY_BARCODE_TEXT));
                return page(&ctx);
            }
        };

        match generate(&state, &meta, &request).await {
            Ok(bytes) if delivery == Delivery::Attachment => attachment(&request, bytes),
            Ok(bytes) => {
                ctx.barcode_image = Some(Preview::new(request.format(), &bytes, request.text()));
                page(&ctx)
            }
            Err(e) => {
                ctx.error = Some(format!("Error generating barcode: {}", e.message()));
                page(&ctx)
            }
        }
    }

    async fn qr(
        req: HttpRequest,
        body: web::Bytes,
        state: web::Data<AppState>,
        delivery: Delivery,
    ) -> HttpResponse {
        let meta = request_meta(&req);
        let raw = qr_fields(&parse_form(&body), "qr_");
        let mut ctx = PageContext {
            qr: raw.clone(),
            ..Default::default()
        };

        let request = match checked_qr(&state, &meta, &raw) {
            Ok(request) => request,
            Err(e) => {
                ctx.error = Some(validation_banner(&e, EMPTY_QR_TEXT));
                return page(&ctx);
            }
        };

        match generate(&state, &meta, &request).await {
            Ok(bytes) if delivery == Delivery::Attachment => attachment(&request, bytes),
            Ok(bytes) => {
                ctx.qr_image = Some(Preview::new(request.format(), &bytes, request.text()));
                page(&ctx)
            }
            Err(e) => {
                ctx.error = Some(format!("Error generating QR code: {}", e.message()));
                page(&ctx)
            }
        }
    }
}

/// 页面路由，需放在其他 scope 之后注册
pub fn page_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(PageService::index))
        .route("/", web::head().to(PageService::index))
        .route("/generate", web::post().to(PageService::generate_barcode))
        .route("/download", web::post().to(PageService::download_barcode))
        .route("/generate_qr", web::post().to(PageService::generate_qr))
        .route("/download_qr", web::post().to(PageService::download_qr))
}
