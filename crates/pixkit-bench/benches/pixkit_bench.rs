//! Benchmarks for pixkit operations.
//!
//! Run with: `cargo bench -p pixkit-bench`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pixkit_core::Image;
use pixkit_ops::{filter, pointwise, resize, wavelet, Kernel};

fn test_image(size: u32) -> Image {
    Image::from_fn(size, size, 3, |x, y| {
        [
            ((x * 37 + y * 91) % 256) as u8,
            ((x * 13 + y * 59) % 256) as u8,
            ((x ^ y) % 256) as u8,
            255,
        ]
    })
    .unwrap()
}

/// Benchmark 5x5 convolution kernels.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");

    for size in [64u32, 256, 1024].iter() {
        let img = test_image(*size);
        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));

        group.bench_with_input(BenchmarkId::new("blur", size), &img, |b, img| {
            b.iter(|| filter::blur(black_box(img), None))
        });

        group.bench_with_input(BenchmarkId::new("sharpen", size), &img, |b, img| {
            b.iter(|| filter::sharpen(black_box(img), None))
        });
    }

    let img = test_image(256);
    for k in [3usize, 7, 11] {
        let kernel = Kernel::binomial(k);
        group.bench_with_input(BenchmarkId::new("binomial_256", k), &kernel, |b, kernel| {
            b.iter(|| filter::convolve(black_box(&img), kernel, None))
        });
    }

    group.finish();
}

/// Benchmark Haar wavelet compression.
fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for size in [64u32, 256, 512].iter() {
        let img = test_image(*size);
        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));

        group.bench_with_input(BenchmarkId::new("ratio_50", size), &img, |b, img| {
            b.iter(|| wavelet::compress(black_box(img), 50))
        });
    }

    // Non-power-of-two source pays for padding.
    let odd = test_image(300);
    group.bench_function("ratio_90_300", |b| b.iter(|| wavelet::compress(black_box(&odd), 90)));

    group.finish();
}

/// Benchmark bilinear downscale.
fn bench_downscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("downscale");
    let img = test_image(1024);

    for target in [512i64, 300, 64].iter() {
        group.throughput(Throughput::Elements((*target as u64) * (*target as u64)));
        group.bench_with_input(BenchmarkId::new("from_1024", target), target, |b, &t| {
            b.iter(|| resize::downscale(black_box(&img), t, t))
        });
    }

    group.finish();
}

/// Benchmark the pointwise runner.
fn bench_pointwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointwise");
    let img = test_image(1024);
    group.throughput(Throughput::Elements(1024 * 1024));

    group.bench_function("brighten", |b| {
        b.iter(|| pointwise::brighten(black_box(&img), 20, None))
    });
    group.bench_function("sepia", |b| b.iter(|| pointwise::sepia(black_box(&img), None)));

    group.finish();
}

criterion_group!(
    benches,
    bench_convolve,
    bench_compress,
    bench_downscale,
    bench_pointwise,
);

criterion_main!(benches);
