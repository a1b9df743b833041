//! Criterion benchmarks for the full sweep.
//! Focus sizes: n in {10, 50, 200, 500}.
//! Results: by default under target/criterion; to store elsewhere, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p fortune

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use fortune::prelude::*;

fn bench_sweep(c: &mut Criterion) {
    let rect = Rect::sized(800.0, 600.0);
    let mut group = c.benchmark_group("sweep");
    for &n in &[10usize, 50, 200, 500] {
        group.bench_with_input(BenchmarkId::new("run_to_completion", n), &n, |b, &n| {
            b.iter_batched(
                || VoronoiSweep::with_random_sites(n, rect, 43, GeomCfg::default()).unwrap(),
                |mut sweep| {
                    sweep.run_to_completion();
                    sweep.edges().len()
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("site_generation", n), &n, |b, &n| {
            b.iter(|| uniform_sites(n, rect, 44))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
