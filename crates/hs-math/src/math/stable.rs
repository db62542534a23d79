//! Numerically stable primitives for log-domain posterior math.

use std::f64::consts::PI;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // These are published numerical constants
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Softmax over logits, shifting by the maximum before exponentiating.
///
/// Empty input yields an empty vector. If every logit is `-inf` the mass is
/// spread uniformly rather than producing NaN.
pub fn softmax_from_logits(logits: &[f64]) -> Vec<f64> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        let uniform = 1.0 / logits.len() as f64;
        return vec![uniform; logits.len()];
    }
    let exps: Vec<f64> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Natural log of the Gamma function (log |Gamma(z)|).
///
/// Lanczos approximation, with reflection for z < 0.5.
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && (z - z.round()).abs() < 1e-15 {
        return f64::NAN;
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        if sin_pi == 0.0 {
            return f64::NAN;
        }
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let z_minus = z - 1.0;
    let mut x = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += coeff / (z_minus + i as f64);
    }
    let t = z_minus + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z_minus + 0.5) * t.ln() - t + x.ln()
}

/// log(n!) via the Gamma function.
pub fn log_factorial(n: u64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    log_gamma((n as f64) + 1.0)
}

/// log(n choose k). `-inf` when k > n.
pub fn log_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    log_factorial(n) - log_factorial(k) - log_factorial(n - k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn softmax_handles_huge_logits() {
        let probs = softmax_from_logits(&[1e6, 1e6 - 1.0, -1e18]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(approx_eq(probs.iter().sum::<f64>(), 1.0, 1e-12));
        assert_eq!(probs[2], 0.0);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn softmax_equal_logits_is_uniform() {
        let probs = softmax_from_logits(&[-7.5; 4]);
        for p in probs {
            assert_eq!(p, 0.25);
        }
    }

    #[test]
    fn softmax_all_neg_inf_is_uniform() {
        let probs = softmax_from_logits(&[f64::NEG_INFINITY; 2]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn softmax_empty() {
        assert!(softmax_from_logits(&[]).is_empty());
    }

    #[test]
    fn log_gamma_known_values() {
        assert!(approx_eq(log_gamma(1.0), 0.0, 1e-12));
        assert!(approx_eq(log_gamma(0.5), 0.5 * PI.ln(), 1e-10));
        assert!(approx_eq(log_gamma(5.0), 24.0f64.ln(), 1e-10));
    }

    #[test]
    fn log_gamma_negative_integer_is_nan() {
        assert!(log_gamma(-2.0).is_nan());
    }

    #[test]
    fn log_factorial_and_binomial() {
        assert!(approx_eq(log_factorial(5), 120.0f64.ln(), 1e-12));
        assert!(approx_eq(log_binomial(5, 2), 10.0f64.ln(), 1e-12));
        assert_eq!(log_binomial(7, 0), 0.0);
        assert_eq!(log_binomial(7, 7), 0.0);
        assert_eq!(log_binomial(3, 4), f64::NEG_INFINITY);
    }
}
