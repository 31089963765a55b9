//! Criterion micro-benchmarks for the weighted selector.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sinter_solve::{Selector, SumTreeSelector};

fn weights(n: usize) -> Vec<f64> {
    // Deterministic pseudo-random weights, a third of them zero.
    (0..n)
        .map(|i| {
            let h = (i as u64).wrapping_mul(6364136223846793007) >> 33;
            if h % 3 == 0 {
                0.0
            } else {
                (h % 1000) as f64 / 250.0
            }
        })
        .collect()
}

/// Benchmark: rebuild a 4K-leaf selector from a full table.
fn bench_fill_4k(c: &mut Criterion) {
    let table = weights(4096);
    c.bench_function("selector_fill_4k", |b| {
        let mut sel = SumTreeSelector::new(table.len());
        b.iter(|| {
            sel.fill(&table);
            black_box(sel.total());
        });
    });
}

/// Benchmark: update 5 sites then sample, the per-event KMC pattern.
fn bench_update_and_sample_4k(c: &mut Criterion) {
    let mut table = weights(4096);
    let mut sel = SumTreeSelector::new(table.len());
    sel.fill(&table);
    c.bench_function("selector_update_sample_4k", |b| {
        let mut k = 0usize;
        b.iter(|| {
            let sites = [k % 4096, (k + 7) % 4096, (k + 63) % 4096, (k + 511) % 4096, (k + 2047) % 4096];
            for &s in &sites {
                table[s] = (s % 7) as f64;
            }
            sel.update(&sites, &table);
            let u = (k % 997) as f64 / 997.0;
            black_box(sel.sample(u));
            k += 1;
        });
    });
}

criterion_group!(benches, bench_fill_4k, bench_update_and_sample_4k);
criterion_main!(benches);
