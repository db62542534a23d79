//! Setting posterior P(setting | counters).
//!
//! Each candidate setting starts from its log prior. Every observed counter
//! with a matching reference rate adds a weighted binomial log-likelihood.
//! The scores are turned into probabilities with a max-shifted softmax.

use super::observation::Observation;
use super::EstimateError;
use hs_common::{Setting, Signal};
use hs_config::validate::{validate_prior, validate_weights};
use hs_config::{Prior, ReferenceSpec, SignalWeights};
use hs_math::{log_pmf, log_pmf_rate, softmax_from_logits};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Floor applied to prior probabilities before taking the log.
pub const PRIOR_FLOOR: f64 = 1e-12;

/// One signal's share of the top setting's evidence, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Contribution {
    #[schemars(with = "String")]
    pub signal: Signal,
    pub pct: f64,
}

/// One row of the estimator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettingPosterior {
    pub setting: Setting,
    /// Unnormalized log posterior (log prior + weighted log-likelihoods).
    pub logp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ll_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ll_big: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ll_grape: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ll_suika_cz: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ll_extras: BTreeMap<String, f64>,
    pub prob: f64,
    /// `logp` minus the top setting's `logp`. Zero for the winner.
    pub gap: f64,
    /// Set on the top row only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrib_pct: Option<Vec<Contribution>>,
}

impl SettingPosterior {
    /// Present likelihood terms in priority order: total, big, grape, suika CZ, extras.
    pub fn signal_terms(&self) -> Vec<(Signal, f64)> {
        let mut terms = Vec::new();
        if let Some(ll) = self.ll_total {
            terms.push((Signal::Total, ll));
        }
        if let Some(ll) = self.ll_big {
            terms.push((Signal::Big, ll));
        }
        if let Some(ll) = self.ll_grape {
            terms.push((Signal::Grape, ll));
        }
        if let Some(ll) = self.ll_suika_cz {
            terms.push((Signal::SuikaCz, ll));
        }
        for (id, ll) in &self.ll_extras {
            terms.push((Signal::Extra(id.clone()), *ll));
        }
        terms
    }
}

/// Knobs for [`estimate_setting_probs`].
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    /// Prior weights. `None` means uniform.
    pub prior: Option<Prior>,
    pub weights: SignalWeights,
    /// Restrict candidates to these settings.
    pub allowed: Option<BTreeSet<Setting>>,
}

impl EstimateOptions {
    pub fn with_prior(mut self, prior: Prior) -> Self {
        self.prior = Some(prior);
        self
    }

    pub fn with_weights(mut self, weights: SignalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_allowed(mut self, allowed: impl IntoIterator<Item = Setting>) -> Self {
        self.allowed = Some(allowed.into_iter().collect());
        self
    }
}

/// Posterior over the settings in `specs`, sorted by descending probability.
///
/// Returns an empty vector when `games == 0` or no candidate setting remains
/// after the `allowed` restriction. Counts are not validated here; see
/// [`checked_estimate`].
pub fn estimate_setting_probs(
    specs: &BTreeMap<Setting, ReferenceSpec>,
    obs: &Observation,
    options: &EstimateOptions,
) -> Vec<SettingPosterior> {
    let candidates: Vec<(Setting, &ReferenceSpec)> = specs
        .iter()
        .filter(|(setting, _)| {
            options
                .allowed
                .as_ref()
                .map_or(true, |allowed| allowed.contains(setting))
        })
        .map(|(setting, spec)| (*setting, spec))
        .collect();

    if obs.games == 0 || candidates.is_empty() {
        tracing::debug!(
            games = obs.games,
            candidates = candidates.len(),
            "nothing to estimate"
        );
        return Vec::new();
    }

    let settings: Vec<Setting> = candidates.iter().map(|(s, _)| *s).collect();
    let prior = options
        .prior
        .clone()
        .unwrap_or_else(Prior::uniform)
        .normalized(&settings);

    let mut rows: Vec<SettingPosterior> = candidates
        .iter()
        .zip(prior)
        .map(|((setting, spec), prior_p)| {
            score_setting(*setting, spec, prior_p, obs, &options.weights)
        })
        .collect();

    let logits: Vec<f64> = rows.iter().map(|r| r.logp).collect();
    for (row, prob) in rows.iter_mut().zip(softmax_from_logits(&logits)) {
        row.prob = prob;
    }

    // Stable sort keeps ascending setting order among ties.
    rows.sort_by(|a, b| b.logp.total_cmp(&a.logp));

    let best = rows[0].logp;
    for (i, row) in rows.iter_mut().enumerate() {
        row.gap = if i == 0 { 0.0 } else { (row.logp - best).min(0.0) };
    }
    rows[0].contrib_pct = Some(contribution_breakdown(&rows[0]));

    tracing::debug!(
        top = %rows[0].setting,
        prob = rows[0].prob,
        games = obs.games,
        "posterior computed"
    );

    rows
}

fn score_setting(
    setting: Setting,
    spec: &ReferenceSpec,
    prior_p: f64,
    obs: &Observation,
    weights: &SignalWeights,
) -> SettingPosterior {
    let games = obs.games;
    let mut logp = prior_p.max(PRIOR_FLOOR).ln();

    let ll_total = obs
        .total_count
        .map(|k| log_pmf_rate(k, games, spec.reg_total) * weights.total);
    let ll_big = obs
        .big_count
        .map(|k| log_pmf_rate(k, games, spec.big) * weights.big);
    let ll_grape = obs
        .grape_count
        .zip(spec.grape)
        .map(|(k, rate)| log_pmf_rate(k, games, rate) * weights.grape);
    // Binomial over suika trials, with the CZ chance used as-is.
    let ll_suika_cz = obs
        .suika_cz
        .zip(spec.suika_cz_rate)
        .filter(|(_, p)| (0.0..=1.0).contains(p))
        .map(|(cz, p)| log_pmf(cz.hits, cz.trials, p) * weights.suika_cz);

    let ll_extras: BTreeMap<String, f64> = obs
        .extra_counts
        .iter()
        .filter_map(|(id, k)| {
            let rate = *spec.extras.get(id)?;
            (rate.is_finite() && rate > 0.0)
                .then(|| (id.clone(), log_pmf_rate(*k, games, rate) * weights.extra))
        })
        .collect();

    logp += ll_total.unwrap_or(0.0) + ll_big.unwrap_or(0.0) + ll_grape.unwrap_or(0.0);
    logp += ll_suika_cz.unwrap_or(0.0);
    logp += ll_extras.values().sum::<f64>();

    tracing::trace!(
        setting = %setting,
        logp,
        ll_total = ?ll_total,
        ll_big = ?ll_big,
        ll_grape = ?ll_grape,
        ll_suika_cz = ?ll_suika_cz,
        "scored setting"
    );

    SettingPosterior {
        setting,
        logp,
        ll_total,
        ll_big,
        ll_grape,
        ll_suika_cz,
        ll_extras,
        prob: 0.0,
        gap: 0.0,
        contrib_pct: None,
    }
}

/// Share of |log-likelihood| per present signal, summing to 100.
///
/// Signals with zero contribution are omitted. Sorted by descending share,
/// ties in signal priority order.
pub fn contribution_breakdown(row: &SettingPosterior) -> Vec<Contribution> {
    let terms: Vec<(Signal, f64)> = row
        .signal_terms()
        .into_iter()
        .map(|(signal, ll)| (signal, ll.abs()))
        .collect();
    let sum: f64 = terms.iter().map(|(_, v)| v).sum();
    let sum = if sum > 0.0 { sum } else { 1.0 };

    let mut out: Vec<Contribution> = terms
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(signal, v)| Contribution {
            signal,
            pct: v / sum * 100.0,
        })
        .collect();
    out.sort_by(|a, b| b.pct.total_cmp(&a.pct));
    out
}

/// Validate inputs, then estimate.
///
/// Unlike [`estimate_setting_probs`], an empty result is an error here.
pub fn checked_estimate(
    specs: &BTreeMap<Setting, ReferenceSpec>,
    obs: &Observation,
    options: &EstimateOptions,
) -> Result<Vec<SettingPosterior>, EstimateError> {
    obs.validate()?;
    validate_weights(&options.weights).map_err(|e| EstimateError::InvalidOptions {
        message: e.to_string(),
    })?;
    if let Some(prior) = &options.prior {
        validate_prior(prior).map_err(|e| EstimateError::InvalidOptions {
            message: e.to_string(),
        })?;
    }

    let rows = estimate_setting_probs(specs, obs, options);
    if rows.is_empty() {
        return Err(EstimateError::NoCandidates);
    }
    Ok(rows)
}

/// First `n` rows of a sorted posterior.
pub fn top_n(posterior: &[SettingPosterior], n: usize) -> &[SettingPosterior] {
    &posterior[..n.min(posterior.len())]
}

/// Display heuristic for how much the sample size supports the ranking.
///
/// `min(1, log10(max(games, 1)) / 4)`: 10 000 spins reads as full confidence.
pub fn confidence(games: u64) -> f64 {
    ((games.max(1) as f64).log10() / 4.0).min(1.0)
}
