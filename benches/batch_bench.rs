//! Benchmark: scalar backend vs native backend on shader-style kernels.
//!
//! Correctness of both paths is covered by the integration tests.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lockstep::{Backend, CpuFeatures, Float, Native, Scalar, WriteMask};

const PIXELS: usize = 4096;

fn shade<B: Backend, const N: usize>(x: Float<B, N>, y: Float<B, N>) -> Float<B, N> {
    let d = (x * x + y * y).sqrt();
    let ring = Float::<B, N>::splat(0.5).smoothstep(0.55, (d * 8.0).fract());
    let angle = y.atan2(x).cos() * 0.5 + 0.5;
    ring.mix(angle, 0.25).clamp(0.0, 1.0)
}

fn run<B: Backend, const N: usize>(coords: &[f32]) -> f32 {
    let width = Float::<B, N>::WIDTH;
    let mut acc = Float::<B, N>::splat(0.0);
    for chunk in coords.chunks_exact(width) {
        let x = Float::<B, N>::from_slice(chunk);
        acc += shade(x, x * 0.5 - 1.0);
    }
    acc.to_vec().iter().sum()
}

fn run_branchy<B: Backend, const N: usize>(coords: &[f32]) -> f32 {
    let width = Float::<B, N>::WIDTH;
    let mut acc = Float::<B, N>::splat(0.0);
    let mut wm = WriteMask::<B, N>::new();
    for chunk in coords.chunks_exact(width) {
        let x = Float::<B, N>::from_slice(chunk);
        let mut v = x;
        wm.branch(
            &mut v,
            x.cmp_gt(0.5),
            |wm, v| {
                let s = v.sin();
                wm.assign(v, s)
            },
            |wm, v| {
                let e = v.exp2();
                wm.assign(v, e)
            },
        );
        acc += v;
    }
    acc.to_vec().iter().sum()
}

fn shade_benchmark(c: &mut Criterion) {
    log::info!("native backend {} on {:?}", Native::NAME, CpuFeatures::detect());
    let coords: Vec<f32> = (0..PIXELS).map(|i| i as f32 / PIXELS as f32).collect();

    let mut group = c.benchmark_group("shade");
    group.throughput(Throughput::Elements(PIXELS as u64));
    group.bench_with_input(BenchmarkId::new("scalar", PIXELS), &coords, |b, coords| {
        b.iter(|| run::<Scalar, 4>(black_box(coords)))
    });
    group.bench_with_input(BenchmarkId::new("native_x1", PIXELS), &coords, |b, coords| {
        b.iter(|| run::<Native, 1>(black_box(coords)))
    });
    group.bench_with_input(BenchmarkId::new("native_x4", PIXELS), &coords, |b, coords| {
        b.iter(|| run::<Native, 4>(black_box(coords)))
    });
    group.finish();
}

fn branch_benchmark(c: &mut Criterion) {
    let coords: Vec<f32> = (0..PIXELS).map(|i| i as f32 / PIXELS as f32).collect();

    let mut group = c.benchmark_group("branch");
    group.throughput(Throughput::Elements(PIXELS as u64));
    group.bench_function("scalar", |b| b.iter(|| run_branchy::<Scalar, 4>(black_box(&coords))));
    group.bench_function("native_x2", |b| {
        b.iter(|| run_branchy::<Native, 2>(black_box(&coords)))
    });
    group.finish();
}

criterion_group!(benches, shade_benchmark, branch_benchmark);
criterion_main!(benches);
