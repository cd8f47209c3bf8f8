use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use imgpress::codec::compress_bytes;
use imgpress::formats::ImageKind;
use imgpress::preset::{Preset, PresetConfig};
use std::io::Cursor;

fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    });
    DynamicImage::ImageRgba8(img)
}

fn encoded_sample(kind: ImageKind, width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    gradient_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), kind.to_image_format())
        .unwrap();
    buf
}

fn bench_preset_resolution(c: &mut Criterion) {
    c.bench_function("preset_resolution", |b| {
        b.iter(|| {
            PresetConfig::resolve(
                black_box(Some("balanced")),
                black_box(Some(85)),
                false,
                false,
                false,
            )
        })
    });
}

fn bench_signature_detection(c: &mut Criterion) {
    let samples: Vec<Vec<u8>> = ImageKind::all()
        .iter()
        .map(|kind| encoded_sample(*kind, 32, 32))
        .collect();

    c.bench_function("signature_detection", |b| {
        b.iter(|| {
            for sample in &samples {
                black_box(ImageKind::from_signature(black_box(sample)));
            }
        })
    });
}

fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let config = PresetConfig::from_preset(Preset::Balanced);

    for kind in [ImageKind::Png, ImageKind::Jpeg, ImageKind::WebP] {
        for (label, width, height) in [("small", 320, 240), ("medium", 1280, 720)] {
            let input = encoded_sample(kind, width, height);
            group.bench_with_input(
                BenchmarkId::new(kind.to_string(), label),
                &input,
                |b, input| {
                    b.iter(|| compress_bytes(black_box(input), kind, kind, black_box(&config)))
                },
            );
        }
    }

    group.finish();
}

fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("presets");
    let input = encoded_sample(ImageKind::Jpeg, 640, 480);

    for preset in [Preset::Fast, Preset::Balanced, Preset::Quality] {
        let config = PresetConfig::from_preset(preset);
        group.bench_with_input(
            BenchmarkId::from_parameter(preset.to_string()),
            &input,
            |b, input| {
                b.iter(|| {
                    compress_bytes(
                        black_box(input),
                        ImageKind::Jpeg,
                        ImageKind::Jpeg,
                        black_box(&config),
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_preset_resolution,
    bench_signature_detection,
    bench_codecs,
    bench_presets
);
criterion_main!(benches);
