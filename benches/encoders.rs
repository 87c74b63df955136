//! 编码性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use codemint::services::encoder::{encode_barcode, encode_qr};
use codemint::services::{
    BarcodeParams, EcLevel, ImageFormat, QrOptions, QrParams, RawQrRequest, Symbology,
    validate_qr,
};

// ============== 一维码 ==============

fn bench_barcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoder/barcode");

    for (symbology, text) in [
        (Symbology::Code128, "HELLO123"),
        (Symbology::Ean13, "400638133393"),
        (Symbology::Itf, "1234567890"),
        (Symbology::Isbn10, "0-306-40615-2"),
    ] {
        let params = BarcodeParams {
            text: text.to_string(),
            symbology,
            format: ImageFormat::Png,
        };
        group.bench_with_input(
            BenchmarkId::new("png", symbology.to_string()),
            &params,
            |b, p| b.iter(|| encode_barcode(black_box(p)).unwrap()),
        );
    }

    group.finish();
}

// ============== 二维码 ==============

fn bench_qr(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoder/qr");
    let text = "https://example.com/some/longer/path?with=query&and=more";

    for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Webp] {
        let params = QrParams {
            text: text.to_string(),
            format,
            options: QrOptions::default(),
        };
        group.bench_with_input(BenchmarkId::new("format", format), &params, |b, p| {
            b.iter(|| encode_qr(black_box(p)).unwrap())
        });
    }

    for box_size in [2u32, 10, 25] {
        let params = QrParams {
            text: text.to_string(),
            format: ImageFormat::Png,
            options: QrOptions {
                box_size,
                error_correction: EcLevel::H,
                ..QrOptions::default()
            },
        };
        group.bench_with_input(BenchmarkId::new("box_size", box_size), &params, |b, p| {
            b.iter(|| encode_qr(black_box(p)).unwrap())
        });
    }

    group.finish();
}

// ============== 参数校验 ==============

fn bench_validate(c: &mut Criterion) {
    let raw = RawQrRequest {
        text: Some("hello".to_string()),
        error_correction: Some("q".to_string()),
        image_format: Some("webp".to_string()),
        fill_color: Some("#112233".to_string()),
        back_color: Some("#FFFFFF".to_string()),
        box_size: Some("12".to_string()),
        border: Some("2".to_string()),
    };
    c.bench_function("validate/qr", |b| b.iter(|| validate_qr(black_box(&raw)).unwrap()));
}

criterion_group!(benches, bench_barcode, bench_qr, bench_validate);
criterion_main!(benches);
