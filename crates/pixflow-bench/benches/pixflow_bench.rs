//! Benchmarks for pixflow operations.
//!
//! Run with: `cargo bench -p pixflow-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use pixflow_core::{PixelBuffer, Rgba8};
use pixflow_ops::color::grayscale;
use pixflow_ops::filter::{self, Accumulate};
use pixflow_ops::transform::rotate_180;
use pixflow_ops::{Kernel, Pipeline, PipelineConfig, TransformRequest, parallel};

fn noise(width: u32, height: u32) -> PixelBuffer {
    let mut state = 0x9E37_79B9u32;
    let samples = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Rgba8::from_array(state.to_le_bytes())
        })
        .collect();
    PixelBuffer::from_samples(width, height, samples).expect("valid buffer")
}

/// Benchmark Gaussian kernel generation.
fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    for size in [3usize, 9, 23, 51] {
        group.bench_with_input(BenchmarkId::new("gaussian", size), &size, |b, &s| {
            b.iter(|| Kernel::gaussian(black_box(s), 3.0))
        });
    }
    group.finish();
}

/// Benchmark the per-pixel stages.
fn bench_pixel_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_ops");
    for side in [256u32, 1024] {
        let src = noise(side, side);
        group.throughput(Throughput::Elements(src.pixel_count() as u64));

        group.bench_with_input(BenchmarkId::new("grayscale", side), &src, |b, s| {
            b.iter_batched_ref(|| s.clone(), |buf| grayscale(buf), criterion::BatchSize::LargeInput)
        });

        group.bench_with_input(BenchmarkId::new("rotate_180", side), &src, |b, s| {
            b.iter_batched_ref(|| s.clone(), |buf| rotate_180(buf), criterion::BatchSize::LargeInput)
        });
    }
    group.finish();
}

/// Benchmark serial vs parallel convolution.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    group.sample_size(10);

    let src = noise(512, 512);
    group.throughput(Throughput::Elements(src.pixel_count() as u64));

    for size in [5usize, 23] {
        let kernel = Kernel::gaussian(size, 3.0).expect("valid kernel");

        group.bench_with_input(BenchmarkId::new("serial", size), &kernel, |b, k| {
            b.iter(|| filter::convolve(black_box(&src), k, Accumulate::Saturate))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &kernel, |b, k| {
            b.iter(|| parallel::convolve(black_box(&src), k, Accumulate::Saturate))
        });

        group.bench_with_input(BenchmarkId::new("parallel_wrap", size), &kernel, |b, k| {
            b.iter(|| parallel::convolve(black_box(&src), k, Accumulate::Wrap))
        });
    }
    group.finish();
}

/// Benchmark the full pipeline under both schedules.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let src = noise(512, 512);
    let request = TransformRequest::new().with_grayscale().with_rotate().with_blur();

    for (name, config) in [
        ("ordered", PipelineConfig::default()),
        ("concurrent", PipelineConfig::concurrent()),
    ] {
        let pipeline = Pipeline::new(config).expect("valid config");
        group.bench_function(name, |b| {
            b.iter_batched(
                || src.clone(),
                |buf| pipeline.run(buf, &request),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Benchmark PNG decode and JPEG encode of a pipeline-sized image.
fn bench_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("codecs");
    let image = noise(512, 512).to_image();
    let png = pixflow_io::png::encode(&image).expect("png encode");

    group.bench_function("png_decode", |b| b.iter(|| pixflow_io::decode(black_box(&png))));
    group.bench_function("jpeg_encode", |b| {
        b.iter(|| pixflow_io::jpeg::encode(black_box(&image), pixflow_io::jpeg::DEFAULT_QUALITY))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_kernel,
    bench_pixel_ops,
    bench_convolve,
    bench_pipeline,
    bench_codecs,
);
criterion_main!(benches);
