//! Monte Carlo forecast of net medals over a future horizon.

pub mod histogram;
pub mod simulate;

pub use histogram::{histogram, HistogramBin};
pub use simulate::forecast_diff_medal;

use hs_common::Setting;
use hs_config::ForecastDefaults;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Future spins for a run.
///
/// An explicit `games_future` wins; otherwise `horizon` must be one the
/// catalog offers. With neither, the first offered horizon is used.
pub fn resolve_games_future(
    defaults: &ForecastDefaults,
    horizon: Option<u64>,
    games_future: Option<u64>,
) -> Result<u64, ForecastError> {
    match (games_future, horizon) {
        (Some(0), _) => Err(ForecastError::NoHorizon),
        (Some(games), _) => Ok(games),
        (None, Some(games)) if defaults.horizons.contains(&games) => Ok(games),
        (None, Some(games)) => Err(ForecastError::UnsupportedHorizon {
            games,
            offered: defaults.horizons.clone(),
        }),
        (None, None) => defaults
            .horizons
            .first()
            .copied()
            .ok_or(ForecastError::NoHorizon),
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastParams {
    /// Future spins to simulate.
    pub games_future: u64,
    pub n_sims: u32,
    /// Average medals paid per BIG.
    pub avg_big_payout: i64,
    /// Average medals paid per REG.
    pub avg_reg_payout: i64,
    /// Medals wagered per spin.
    pub bet_per_game: i64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self::from_defaults(&ForecastDefaults::default(), 500)
    }
}

impl ForecastParams {
    /// Parameters from catalog defaults for a given horizon.
    pub fn from_defaults(defaults: &ForecastDefaults, games_future: u64) -> Self {
        Self {
            games_future,
            n_sims: defaults.n_sims,
            avg_big_payout: defaults.payout.avg_big,
            avg_reg_payout: defaults.payout.avg_reg,
            bet_per_game: defaults.bet_per_game,
        }
    }

    pub fn with_sims(mut self, n_sims: u32) -> Self {
        self.n_sims = n_sims;
        self
    }

    /// Total medals wagered over the horizon, `None` if it overflows `i64`.
    pub fn cost(&self) -> Option<i64> {
        i64::try_from(self.games_future)
            .ok()?
            .checked_mul(self.bet_per_game)
    }

    /// Net medals for one simulated future, `None` on `i64` overflow.
    pub fn net_medals(&self, big: u64, reg: u64) -> Option<i64> {
        let big_pay = i64::try_from(big).ok()?.checked_mul(self.avg_big_payout)?;
        let reg_pay = i64::try_from(reg).ok()?.checked_mul(self.avg_reg_payout)?;
        big_pay.checked_add(reg_pay)?.checked_sub(self.cost()?)
    }
}

/// Distribution of simulated net medals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastSummary {
    pub mean: f64,
    pub median: f64,
    pub p05: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    /// Every simulated outcome, in draw order.
    pub diffs: Vec<i64>,
}

impl ForecastSummary {
    pub fn min(&self) -> Option<i64> {
        self.diffs.iter().copied().min()
    }

    pub fn max(&self) -> Option<i64> {
        self.diffs.iter().copied().max()
    }
}

/// Errors raised by the forecast simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("posterior is empty")]
    EmptyPosterior,

    #[error("games_future must be greater than zero")]
    NoHorizon,

    #[error("unsupported horizon {games} (offered: {offered:?})")]
    UnsupportedHorizon { games: u64, offered: Vec<u64> },

    #[error("net medals overflow for games_future {games_future}")]
    Overflow { games_future: u64 },

    #[error("n_sims must be greater than zero")]
    NoSimulations,

    #[error("posterior weights are not a distribution: {0}")]
    InvalidWeights(String),

    #[error("{setting} is not in the machine spec")]
    MissingSetting { setting: Setting },

    #[error("{setting}.{field} rate {rate} does not give a probability in (0, 1]")]
    InvalidRate {
        setting: Setting,
        field: &'static str,
        rate: f64,
    },
}

impl From<ForecastError> for hs_common::Error {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::EmptyPosterior => hs_common::Error::NoEstimate(err.to_string()),
            ForecastError::NoHorizon
            | ForecastError::NoSimulations
            | ForecastError::UnsupportedHorizon { .. }
            | ForecastError::Overflow { .. } => {
                hs_common::Error::InvalidObservation(err.to_string())
            }
            other => hs_common::Error::Forecast(other.to_string()),
        }
    }
}
