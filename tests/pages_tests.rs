//! Form page tests

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentDisposition;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};

use codemint::api::services::{AppState, configure_routes};

use common::{CaptureSink, PNG_SIGNATURE, state_with_sink};

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn form(uri: &str, body: &'static str) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(body)
}

async fn body_text<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let app = app!(AppState::detached());

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("action=\"/generate\""));
    assert!(html.contains("name=\"qr_text\""));
}

#[tokio::test]
async fn test_generate_shows_inline_image() {
    let app = app!(AppState::detached());

    let resp = test::call_service(
        &app,
        form("/generate", "text=HELLO&barcode_type=code128&image_format=PNG").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("src=\"data:image/png;base64,"));
    assert!(html.contains("value=\"HELLO\""));
}

#[tokio::test]
async fn test_generate_empty_text_shows_banner() {
    let app = app!(AppState::detached());

    let resp = test::call_service(&app, form("/generate", "text=&barcode_type=ean8").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Please enter text to generate barcode"));
    assert!(html.contains("<option value=\"ean8\" selected>"));
    assert!(!html.contains("data:image/"));

    let resp = test::call_service(&app, form("/generate_qr", "qr_text=++").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please enter text to generate QR code"));
}

#[tokio::test]
async fn test_encoding_failure_rerenders_page() {
    let app = app!(AppState::detached());

    let resp = test::call_service(&app, form("/download", "text=12AB&barcode_type=upc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("content-disposition").is_none());
    let html = body_text(resp).await;
    assert!(html.contains("Error generating barcode"));
    assert!(html.contains("value=\"12AB\""));
}

#[tokio::test]
async fn test_qr_validation_error_echoes_values() {
    let app = app!(AppState::detached());

    let resp = test::call_service(
        &app,
        form("/generate_qr", "qr_text=hello&qr_box_size=0&qr_fill_color=%23112233").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Invalid box_size"));
    assert!(html.contains("name=\"qr_box_size\" value=\"0\""));
    assert!(html.contains("value=\"#112233\""));
    assert!(html.contains("value=\"hello\""));
}

#[tokio::test]
async fn test_download_barcode_attachment() {
    let app = app!(AppState::detached());

    let resp = test::call_service(
        &app,
        form("/download", "text=HELLO123&barcode_type=code128&image_format=PNG").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    let cd = ContentDisposition::from_raw(resp.headers().get("content-disposition").unwrap())
        .unwrap();
    assert!(cd.is_attachment());
    assert_eq!(cd.get_filename(), Some("code128_barcode_HELLO123.png"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[..8], &PNG_SIGNATURE);
}

#[tokio::test]
async fn test_download_qr_attachment() {
    let app = app!(AppState::detached());

    let resp = test::call_service(
        &app,
        form(
            "/download_qr",
            "qr_text=https%3A%2F%2Fexample.com%2Fa&qr_image_format=WEBP&qr_error_correction=h",
        ).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/webp");
    let cd = ContentDisposition::from_raw(resp.headers().get("content-disposition").unwrap())
        .unwrap();
    assert_eq!(cd.get_filename(), Some("qrcode_httpsexamplecoma.webp"));
}

#[tokio::test]
async fn test_storage_failure_is_invisible_to_client() {
    let sink = CaptureSink::failing();
    let state = state_with_sink(sink.clone());
    let audit = state.audit.clone();
    let app = app!(state);

    let resp = test::call_service(&app, form("/generate", "text=HELLO").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("data:image/png;base64,"));
    assert!(!html.contains("class=\"error\""));

    // 写入失败的记录被丢弃
    assert_eq!(audit.flush().await, 1);
    assert!(sink.records().is_empty());
    assert_eq!(audit.pending(), 0);
}

#[tokio::test]
async fn test_generate_echoes_placeholder_like_text() {
    let app = app!(AppState::detached());

    // text = "%BARCODE_RESULT% %VERSION%"
    let resp = test::call_service(
        &app,
        form("/generate", "text=%25BARCODE_RESULT%25+%25VERSION%25&barcode_type=code128").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("value=\"%BARCODE_RESULT% %VERSION%\""));
    assert_eq!(html.matches("src=\"data:image/png;base64,").count(), 1);
}
