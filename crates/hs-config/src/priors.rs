//! Setting priors and per-signal evidence weights.

use hs_common::Setting;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Non-negative prior weight per setting (e.g. a hall's known distribution).
///
/// Weights need not sum to one. Missing settings weigh zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prior(BTreeMap<Setting, f64>);

impl Prior {
    /// Equal weight on every setting.
    pub fn uniform() -> Self {
        Self(Setting::ALL.iter().map(|s| (*s, 1.0)).collect())
    }

    pub fn from_weights(weights: impl IntoIterator<Item = (Setting, f64)>) -> Self {
        Self(weights.into_iter().collect())
    }

    pub fn set(&mut self, setting: Setting, weight: f64) {
        self.0.insert(setting, weight);
    }

    pub fn weight(&self, setting: Setting) -> f64 {
        self.0.get(&setting).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Setting, f64)> + '_ {
        self.0.iter().map(|(s, w)| (*s, *w))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalize onto `settings`, in that order.
    ///
    /// Negative and NaN weights count as zero. If nothing positive remains the
    /// result is uniform.
    pub fn normalized(&self, settings: &[Setting]) -> Vec<f64> {
        if settings.is_empty() {
            return Vec::new();
        }
        let values: Vec<f64> = settings
            .iter()
            .map(|s| {
                let w = self.weight(*s);
                if w.is_nan() {
                    0.0
                } else {
                    w.max(0.0)
                }
            })
            .collect();
        let total: f64 = values.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            let uniform = 1.0 / settings.len() as f64;
            return vec![uniform; settings.len()];
        }
        values.into_iter().map(|v| v / total).collect()
    }
}

impl FromStr for Prior {
    type Err = String;

    /// Parse `1=2.0,5=1,6=0.5` (any [`Setting`] spelling on the left).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut prior = Prior::default();
        for (key, value) in parse_pairs(s)? {
            let setting = key.parse::<Setting>().map_err(|e| e.to_string())?;
            prior.set(setting, value);
        }
        Ok(prior)
    }
}

/// Multipliers applied to each signal's log-likelihood.
///
/// The combined BIG+REG count is the primary signal. BIG alone overlaps it and
/// is damped so the same bonuses are not counted twice at full strength.
/// Grape is frequent enough to be informative whenever it was counted.
/// Suika CZ is counted over its own trials, not over spins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SignalWeights {
    pub total: f64,
    pub big: f64,
    pub grape: f64,
    pub suika_cz: f64,
    pub extra: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            total: 1.0,
            big: 0.35,
            grape: 0.85,
            suika_cz: 1.0,
            extra: 1.0,
        }
    }
}

impl FromStr for SignalWeights {
    type Err = String;

    /// Parse `total=1,big=0.5`; unspecified signals keep their defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = SignalWeights::default();
        for (key, value) in parse_pairs(s)? {
            match key.as_str() {
                "total" => weights.total = value,
                "big" => weights.big = value,
                "grape" => weights.grape = value,
                "suika_cz" => weights.suika_cz = value,
                "extra" => weights.extra = value,
                other => return Err(format!("unknown signal weight: {other}")),
            }
        }
        Ok(weights)
    }
}

fn parse_pairs(s: &str) -> Result<Vec<(String, f64)>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{part}'"))?;
            let value = value
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number for '{}': {e}", key.trim()))?;
            Ok((key.trim().to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_prior_normalizes_evenly() {
        let probs = Prior::uniform().normalized(&Setting::ALL);
        for p in probs {
            assert!((p - 1.0 / 6.0).abs() < 1e-15);
        }
    }

    #[test]
    fn empty_prior_falls_back_to_uniform() {
        let probs = Prior::default().normalized(&[Setting::S1, Setting::S6]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn negative_and_nan_weights_are_zero() {
        let prior = Prior::from_weights([
            (Setting::S1, -4.0),
            (Setting::S2, f64::NAN),
            (Setting::S3, 3.0),
            (Setting::S4, 1.0),
        ]);
        let probs = prior.normalized(&[Setting::S1, Setting::S2, Setting::S3, Setting::S4]);
        assert_eq!(probs, vec![0.0, 0.0, 0.75, 0.25]);
    }

    #[test]
    fn all_zero_weights_are_uniform() {
        let prior = Prior::from_weights(Setting::ALL.iter().map(|s| (*s, 0.0)));
        let probs = prior.normalized(&[Setting::S2, Setting::S5]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn normalizes_only_requested_settings() {
        let prior = Prior::from_weights([(Setting::S1, 1.0), (Setting::S6, 3.0)]);
        let probs = prior.normalized(&[Setting::S6]);
        assert_eq!(probs, vec![1.0]);
    }

    #[test]
    fn parses_prior_string() {
        let prior: Prior = "1=2, s5 = 1.5 ,設定6=0.5".parse().unwrap();
        assert_eq!(prior.weight(Setting::S1), 2.0);
        assert_eq!(prior.weight(Setting::S5), 1.5);
        assert_eq!(prior.weight(Setting::S6), 0.5);
        assert_eq!(prior.weight(Setting::S3), 0.0);
        assert!("9=1".parse::<Prior>().is_err());
        assert!("1:1".parse::<Prior>().is_err());
    }

    #[test]
    fn default_weights() {
        let w = SignalWeights::default();
        assert_eq!((w.total, w.big, w.grape, w.extra), (1.0, 0.35, 0.85, 1.0));
        assert_eq!(w.suika_cz, 1.0);
    }

    #[test]
    fn parses_weight_overrides() {
        let w: SignalWeights = "big=0.5,grape=0".parse().unwrap();
        assert_eq!(w.total, 1.0);
        assert_eq!(w.big, 0.5);
        assert_eq!(w.grape, 0.0);
        let w: SignalWeights = "suika_cz=0.5".parse().unwrap();
        assert_eq!(w.suika_cz, 0.5);
        assert!("cherry=1".parse::<SignalWeights>().is_err());
        assert!("big=lots".parse::<SignalWeights>().is_err());
    }
}
