//! Raster Benchmarks
//!
//! Performance benchmarks for the per-pixel engines on a 1024x1024 buffer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rastra::{
    apply_lut, build_lut, composite, convolve3x3, decode_gb7, encode_gb7, resample_rgba,
    BlendMode, ConvolveTarget, CurvePoint, Gb7EncodeOptions, KernelPreset, Layer, LutSet,
    LutTarget, PixelBuffer, ResampleMethod, Rgb,
};

const SIZE: u32 = 1024;

fn gradient(size: u32) -> PixelBuffer {
    let data = (0..size * size)
        .flat_map(|i| {
            let v = (i % 256) as u8;
            [v, v / 2, 255 - v, 255]
        })
        .collect();
    PixelBuffer::from_raw(size, size, data).unwrap()
}

fn benchmark_composite(c: &mut Criterion) {
    let layers = vec![
        Layer::image("base", gradient(SIZE)),
        Layer::color("tint", Rgb::new(40, 80, 160), 255)
            .with_opacity(0.5)
            .with_blend_mode(BlendMode::Overlay),
    ];

    c.bench_function("composite_2_layers_1024", |b| {
        b.iter(|| composite(black_box(&layers), SIZE, SIZE))
    });
}

fn benchmark_resample(c: &mut Criterion) {
    let src = gradient(SIZE);

    c.bench_function("resample_bilinear_1024_to_512", |b| {
        b.iter(|| resample_rgba(black_box(&src), SIZE / 2, SIZE / 2, ResampleMethod::Bilinear))
    });
}

fn benchmark_convolve(c: &mut Criterion) {
    let src = gradient(SIZE);
    let kernel = KernelPreset::Gaussian3x3.kernel();

    c.bench_function("convolve_gaussian_1024", |b| {
        b.iter(|| convolve3x3(black_box(&src), &kernel, ConvolveTarget::Rgb, None))
    });
}

fn benchmark_lut(c: &mut Criterion) {
    let src = gradient(SIZE);
    let luts = LutSet::uniform_rgb(build_lut(CurvePoint::new(64, 32), CurvePoint::new(192, 224)));

    c.bench_function("apply_lut_1024", |b| {
        b.iter(|| apply_lut(black_box(&src), &luts, LutTarget::Rgb))
    });
}

fn benchmark_gb7(c: &mut Criterion) {
    let src = gradient(SIZE);
    let opts = Gb7EncodeOptions::default();
    let bytes = encode_gb7(&src, &opts).unwrap();

    c.bench_function("gb7_encode_1024", |b| {
        b.iter(|| encode_gb7(black_box(&src), &opts).unwrap())
    });
    c.bench_function("gb7_decode_1024", |b| {
        b.iter(|| decode_gb7(black_box(&bytes)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_composite,
    benchmark_resample,
    benchmark_convolve,
    benchmark_lut,
    benchmark_gb7
);
criterion_main!(benches);
