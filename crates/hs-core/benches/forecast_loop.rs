//! Criterion benchmarks for the estimate → forecast path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hs_config::builtin::builtin_catalog;
use hs_core::forecast::{forecast_diff_medal, ForecastParams};
use hs_core::inference::{estimate_setting_probs, EstimateOptions, Observation};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_estimate(c: &mut Criterion) {
    let catalog = builtin_catalog();
    let specs = &catalog.machines[0].settings;
    let obs = Observation::from_counters(2000, 7, 5, Some(340)).with_extra("cherry", 40);
    let options = EstimateOptions::default();

    c.bench_function("estimate_6_settings", |b| {
        b.iter(|| black_box(estimate_setting_probs(specs, black_box(&obs), &options)));
    });
}

fn bench_forecast(c: &mut Criterion) {
    let catalog = builtin_catalog();
    let specs = &catalog.machines[0].settings;
    let obs = Observation::from_counters(2000, 7, 5, None);
    let posterior = estimate_setting_probs(specs, &obs, &EstimateOptions::default());

    let mut group = c.benchmark_group("forecast");
    group.sample_size(20);
    for &horizon in &catalog.forecast.horizons {
        let params = ForecastParams::from_defaults(&catalog.forecast, horizon);
        group.bench_with_input(
            BenchmarkId::new("default_sims", horizon),
            &params,
            |b, params| {
                let mut rng = StdRng::seed_from_u64(7);
                b.iter(|| black_box(forecast_diff_medal(&posterior, specs, params, &mut rng)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_estimate, bench_forecast);
criterion_main!(benches);
