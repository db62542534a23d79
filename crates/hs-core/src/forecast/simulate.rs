//! Forecast simulator.
//!
//! Each trial draws a setting from the posterior, then BIG and combined bonus
//! counts from independent binomials under that setting's rates. REG is
//! `max(0, total - big)`. The two draws are not jointly constrained, so the
//! clip slightly overstates how often REG comes out as zero.

use super::{ForecastError, ForecastParams, ForecastSummary};
use crate::inference::SettingPosterior;
use hs_common::Setting;
use hs_config::ReferenceSpec;
use hs_math::SampleSummary;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rand_distr::Binomial;
use std::collections::BTreeMap;

/// Per-setting samplers, built once before the loop.
struct SettingSampler {
    big: Binomial,
    total: Binomial,
}

impl SettingSampler {
    fn new(setting: Setting, spec: &ReferenceSpec, games: u64) -> Result<Self, ForecastError> {
        Ok(Self {
            big: binomial(setting, "big", spec.big, games)?,
            total: binomial(setting, "reg_total", spec.reg_total, games)?,
        })
    }
}

fn binomial(
    setting: Setting,
    field: &'static str,
    rate: f64,
    games: u64,
) -> Result<Binomial, ForecastError> {
    let invalid = || ForecastError::InvalidRate {
        setting,
        field,
        rate,
    };
    let p = hs_math::rate_to_prob(rate).filter(|p| *p <= 1.0).ok_or_else(invalid)?;
    Binomial::new(games, p).map_err(|_| invalid())
}

/// Simulate `n_sims` futures of `games_future` spins and summarize net medals.
///
/// The RNG is supplied by the caller; a seeded generator gives a reproducible
/// forecast.
pub fn forecast_diff_medal<R: Rng + ?Sized>(
    posterior: &[SettingPosterior],
    specs: &BTreeMap<Setting, ReferenceSpec>,
    params: &ForecastParams,
    rng: &mut R,
) -> Result<ForecastSummary, ForecastError> {
    if posterior.is_empty() {
        return Err(ForecastError::EmptyPosterior);
    }
    if params.games_future == 0 {
        return Err(ForecastError::NoHorizon);
    }
    if params.n_sims == 0 {
        return Err(ForecastError::NoSimulations);
    }
    let overflow = || ForecastError::Overflow {
        games_future: params.games_future,
    };
    params.cost().ok_or_else(overflow)?;

    let samplers = posterior
        .iter()
        .map(|row| {
            let spec = specs
                .get(&row.setting)
                .ok_or(ForecastError::MissingSetting {
                    setting: row.setting,
                })?;
            SettingSampler::new(row.setting, spec, params.games_future)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let picker = WeightedIndex::new(posterior.iter().map(|row| row.prob))
        .map_err(|e| ForecastError::InvalidWeights(e.to_string()))?;

    tracing::debug!(
        games_future = params.games_future,
        n_sims = params.n_sims,
        settings = posterior.len(),
        "simulating forecast"
    );

    let diffs: Vec<i64> = (0..params.n_sims)
        .map(|_| {
            let sampler = &samplers[picker.sample(rng)];
            let big = sampler.big.sample(rng);
            let total = sampler.total.sample(rng);
            let reg = total.saturating_sub(big);
            params.net_medals(big, reg).ok_or_else(overflow)
        })
        .collect::<Result<_, _>>()?;

    let samples: Vec<f64> = diffs.iter().map(|d| *d as f64).collect();
    let stats = SampleSummary::from_samples(&samples).ok_or(ForecastError::NoSimulations)?;

    tracing::debug!(
        mean = stats.mean,
        median = stats.median,
        p05 = stats.p05,
        p95 = stats.p95,
        "forecast summarized"
    );

    Ok(ForecastSummary {
        mean: stats.mean,
        median: stats.median,
        p05: stats.p05,
        p25: stats.p25,
        p75: stats.p75,
        p95: stats.p95,
        diffs,
    })
}
