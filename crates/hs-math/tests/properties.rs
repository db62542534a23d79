//! Property-based tests for hs-math numerical functions.

use proptest::prelude::*;
use hs_math::{
    log_binomial, log_pmf, log_pmf_rate, percentile_sorted, softmax_from_logits,
    SampleSummary, LOG_PMF_FLOOR,
};

const TOL: f64 = 1e-10;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// softmax
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn softmax_is_a_distribution(logits in prop::collection::vec(-1e6..1e6f64, 1..12)) {
        let probs = softmax_from_logits(&logits);
        prop_assert_eq!(probs.len(), logits.len());
        let sum: f64 = probs.iter().sum();
        prop_assert!(approx_eq(sum, 1.0, 1e-9), "sum={}", sum);
        for p in &probs {
            prop_assert!((0.0..=1.0).contains(p), "p={}", p);
        }
    }

    #[test]
    fn softmax_preserves_order(a in -500.0..500.0f64, b in -500.0..500.0f64) {
        let probs = softmax_from_logits(&[a, b]);
        if a > b {
            prop_assert!(probs[0] >= probs[1]);
        } else if b > a {
            prop_assert!(probs[1] >= probs[0]);
        }
    }

    #[test]
    fn softmax_survives_floor_sentinel(a in -1e4..0.0f64) {
        let probs = softmax_from_logits(&[a, LOG_PMF_FLOOR]);
        prop_assert_eq!(probs[1], 0.0);
        prop_assert!(approx_eq(probs[0], 1.0, TOL));
    }
}

// ============================================================================
// binomial log-PMF
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn log_pmf_is_a_log_probability(n in 0u64..5000, k in 0u64..5000, rate in 1.01..1000.0f64) {
        let out = log_pmf_rate(k, n, rate);
        if k > n {
            prop_assert_eq!(out, LOG_PMF_FLOOR);
        } else {
            prop_assert!(out.is_finite());
            prop_assert!(out <= 1e-9, "log pmf above zero: {}", out);
        }
    }

    #[test]
    fn log_pmf_symmetry(n in 1u64..300, k in 0u64..300, p in 0.01..0.99f64) {
        let k = k.min(n);
        let direct = log_pmf(k, n, p);
        let mirrored = log_pmf(n - k, n, 1.0 - p);
        prop_assert!(approx_eq(direct, mirrored, 1e-8), "{} vs {}", direct, mirrored);
    }

    #[test]
    fn log_pmf_out_of_unit_interval_is_floor(k in 0u64..100, p in prop_oneof![-5.0..=0.0f64, 1.0..5.0f64]) {
        prop_assert_eq!(log_pmf(k, 100, p), LOG_PMF_FLOOR);
    }

    #[test]
    fn log_binomial_symmetry(n in 0u64..2000, k in 0u64..2000) {
        let k = k.min(n);
        prop_assert!(approx_eq(log_binomial(n, k), log_binomial(n, n - k), 1e-8));
    }
}

// ============================================================================
// percentiles
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn summary_bands_are_ordered(values in prop::collection::vec(-10_000i64..10_000, 1..400)) {
        let as_f64: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        let s = SampleSummary::from_samples(&as_f64).unwrap();
        prop_assert!(s.p05 <= s.p25);
        prop_assert!(s.p25 <= s.median);
        prop_assert!(s.median <= s.p75);
        prop_assert!(s.p75 <= s.p95);
        prop_assert!(s.min <= s.mean && s.mean <= s.max);
    }

    #[test]
    fn percentile_within_sample_range(values in prop::collection::vec(-1e6..1e6f64, 1..100), q in 0.0..=100.0f64) {
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let v = percentile_sorted(&sorted, q);
        prop_assert!(v >= sorted[0] && v <= sorted[sorted.len() - 1]);
    }
}
