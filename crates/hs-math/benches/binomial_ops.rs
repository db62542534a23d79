//! Criterion benchmarks for `hs-math`.
//!
//! Focus on the kernels evaluated once per setting and signal.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hs_math::{log_pmf_rate, softmax_from_logits, SampleSummary};

fn bench_log_pmf(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_pmf");

    for (name, k, n, rate) in [
        ("bonus_short", 12u64, 2_000u64, 229.1),
        ("bonus_long", 40, 8_000, 273.1),
        ("grape", 340, 2_000, 5.9),
    ] {
        group.bench_with_input(BenchmarkId::new("rate", name), &(k, n, rate), |b, &(k, n, r)| {
            b.iter(|| black_box(log_pmf_rate(black_box(k), black_box(n), black_box(r))));
        });
    }

    group.finish();
}

fn bench_summaries(c: &mut Criterion) {
    let logits: Vec<f64> = (0..6).map(|i| -30.0 - i as f64).collect();
    c.bench_function("softmax_6", |b| {
        b.iter(|| black_box(softmax_from_logits(black_box(&logits))));
    });

    let samples: Vec<f64> = (0..3_000).map(|i| ((i * 7919) % 6001) as f64 - 3000.0).collect();
    c.bench_function("summary_3000", |b| {
        b.iter(|| black_box(SampleSummary::from_samples(black_box(&samples))));
    });
}

criterion_group!(benches, bench_log_pmf, bench_summaries);
criterion_main!(benches);
