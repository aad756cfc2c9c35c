//! Benchmark tests for vembed-core URL building
//!
//! Run with: cargo bench -p vembed-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vembed_core::urls::{
    build_cloudflare_stream_url, build_cloudinary_url, build_mux_url, generate_id,
    CloudinaryTransformation, MuxUrlOptions,
};

fn bench_cloudinary(c: &mut Criterion) {
    let transformation = CloudinaryTransformation {
        quality: Some("auto".to_string()),
        width: Some(1280),
        height: Some(720),
        crop: Some("fill".to_string()),
        format: Some("mp4".to_string()),
        ..Default::default()
    }
    .with("ar", "16:9");

    c.bench_function("cloudinary_url", |b| {
        b.iter(|| {
            build_cloudinary_url(
                black_box("demo"),
                black_box("samples/elephants"),
                Some(&transformation),
                true,
            )
        })
    });
}

fn bench_mux(c: &mut Criterion) {
    let options = MuxUrlOptions {
        token: Some("eyJhbGciOiJSUzI1NiJ9.payload.signature".to_string()),
        max_resolution: Some("1080p".to_string()),
        ..Default::default()
    };

    c.bench_function("mux_url", |b| {
        b.iter(|| build_mux_url(black_box("a4nOgmxGWg6gULfcBbAa00gXyfcwPnAFldF8RdsNyk8M"), Some(&options)))
    });
}

fn bench_cloudflare(c: &mut Criterion) {
    c.bench_function("cloudflare_url", |b| {
        b.iter(|| build_cloudflare_stream_url(black_box("f33zs165nr7gyfy4"), black_box("6b9e68b07dfee8cc2d116e4c51d6a957"), None))
    });
}

fn bench_generate_id(c: &mut Criterion) {
    c.bench_function("generate_id", |b| b.iter(|| generate_id(black_box(Some("hls")))));
}

criterion_group!(
    benches,
    bench_cloudinary,
    bench_mux,
    bench_cloudflare,
    bench_generate_id
);
criterion_main!(benches);
