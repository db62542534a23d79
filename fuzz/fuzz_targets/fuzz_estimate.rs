//! Fuzz target for the setting estimator.
//!
//! Arbitrary rates and counts must never panic, and whenever a posterior is
//! returned it must be a probability distribution.

#![no_main]

use arbitrary::Arbitrary;
use hs_common::Setting;
use hs_config::{ReferenceSpec, SignalWeights};
use hs_core::inference::{estimate_setting_probs, EstimateOptions, Observation, SuikaCz};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct Input {
    rates: Vec<(u8, f64, f64, Option<f64>, Option<f64>)>,
    games: u64,
    big: Option<u64>,
    total: Option<u64>,
    grape: Option<u64>,
    suika_cz: Option<(u64, u64)>,
    weights: Option<(f64, f64, f64, f64)>,
    allowed: Option<Vec<u8>>,
}

fuzz_target!(|input: Input| {
    let specs: BTreeMap<Setting, ReferenceSpec> = input
        .rates
        .iter()
        .filter_map(|(tier, big, total, grape, suika_cz)| {
            let setting = Setting::from_tier(tier % 6 + 1)?;
            let mut spec = ReferenceSpec::new(*big, *total);
            spec.grape = *grape;
            spec.suika_cz_rate = *suika_cz;
            Some((setting, spec))
        })
        .collect();

    let obs = Observation {
        games: input.games,
        big_count: input.big,
        total_count: input.total,
        grape_count: input.grape,
        suika_cz: input.suika_cz.map(|(trials, hits)| SuikaCz { trials, hits }),
        extra_counts: BTreeMap::new(),
    };

    let mut options = EstimateOptions::default();
    if let Some((total, big, grape, suika_cz)) = input.weights {
        // Finite, non-negative weights are the estimator's contract.
        if [total, big, grape, suika_cz].iter().all(|w| w.is_finite() && *w >= 0.0 && *w <= 1e3) {
            options = options.with_weights(SignalWeights {
                total,
                big,
                grape,
                suika_cz,
                ..SignalWeights::default()
            });
        }
    }
    if let Some(allowed) = input.allowed {
        options = options.with_allowed(allowed.iter().filter_map(|t| Setting::from_tier(t % 6 + 1)));
    }

    let rows = estimate_setting_probs(&specs, &obs, &options);
    if rows.is_empty() {
        return;
    }
    let sum: f64 = rows.iter().map(|r| r.prob).sum();
    assert!((sum - 1.0).abs() < 1e-6, "posterior sums to {sum}");
    assert!(rows.iter().all(|r| r.gap <= 0.0));
});
