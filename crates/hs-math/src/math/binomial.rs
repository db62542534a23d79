//! Binomial likelihood for hit counters.
//!
//! A counter observed as `k` hits in `n` spins, against a reference rate
//! quoted as "1 in N", is scored with the exact binomial log-PMF:
//!
//! log P(k | n, p) = log C(n, k) + k·log p + (n-k)·log(1-p),  p = 1/N
//!
//! Out-of-domain inputs do not fail. They score [`LOG_PMF_FLOOR`], which acts
//! as "effectively impossible" once passed through a softmax.

use super::stable::log_binomial;

/// Log-likelihood assigned to impossible or malformed observations.
pub const LOG_PMF_FLOOR: f64 = -1e18;

/// Convert a "1 in N" rate to a per-spin probability.
///
/// Returns `None` when the rate is not finite and positive.
pub fn rate_to_prob(rate: f64) -> Option<f64> {
    if rate.is_finite() && rate > 0.0 {
        Some(1.0 / rate)
    } else {
        None
    }
}

/// Binomial log-PMF with a floor for degenerate inputs.
///
/// Returns [`LOG_PMF_FLOOR`] if `p` is not strictly inside (0, 1) or `k > n`.
pub fn log_pmf(k: u64, n: u64, p: f64) -> f64 {
    if k > n || !(p > 0.0 && p < 1.0) {
        return LOG_PMF_FLOOR;
    }
    let hits = k as f64;
    let misses = (n - k) as f64;
    log_binomial(n, k) + hits * p.ln() + misses * (-p).ln_1p()
}

/// [`log_pmf`] for a "1 in N" rate.
pub fn log_pmf_rate(k: u64, n: u64, rate: f64) -> f64 {
    match rate_to_prob(rate) {
        Some(p) => log_pmf(k, n, p),
        None => LOG_PMF_FLOOR,
    }
}
