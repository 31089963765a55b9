//! Criterion benchmarks for full sweeps under each style.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sinter_bench::reference_scheduler;
use sinter_engine::SweepStyle;

/// Benchmark: one rejection sweep over 4K sites, no masking.
fn bench_sweep_plain_4k(c: &mut Criterion) {
    c.bench_function("sweep_plain_4k", |b| {
        let mut s = reference_scheduler(SweepStyle::Plain, 4, 7);
        b.iter(|| {
            s.sweep();
            black_box(s.time());
        });
    });
}

/// Benchmark: one masked rejection sweep over 4K sites.
///
/// After coarsening sets in, most sites are masked; steady-state sweep
/// cost is what this measures.
fn bench_sweep_masked_4k(c: &mut Criterion) {
    c.bench_function("sweep_masked_4k", |b| {
        let mut s = reference_scheduler(SweepStyle::Masked, 4, 7);
        s.run_sweeps(50);
        b.iter(|| {
            s.sweep();
            black_box(s.time());
        });
    });
}

/// Benchmark: one exact event-driven sweep over 4K sites in 4 sectors.
fn bench_sweep_kmc_4k(c: &mut Criterion) {
    c.bench_function("sweep_kmc_4k", |b| {
        let mut s = reference_scheduler(SweepStyle::Kmc, 4, 7);
        b.iter(|| {
            s.sweep();
            black_box(s.time());
        });
    });
}

criterion_group!(
    benches,
    bench_sweep_plain_4k,
    bench_sweep_masked_4k,
    bench_sweep_kmc_4k
);
criterion_main!(benches);
