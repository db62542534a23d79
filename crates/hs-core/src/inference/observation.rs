//! Observed play counters for one session.

use super::EstimateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suika CZ tally: suikas seen and how many of them won a CZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuikaCz {
    pub trials: u64,
    pub hits: u64,
}

/// Counters observed at the machine.
///
/// Absent counters contribute nothing to the posterior. A counter that is
/// present with value 0 is real evidence ("no grapes in 600 spins").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Total spins played.
    pub games: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_count: Option<u64>,

    /// BIG + REG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grape_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suika_cz: Option<SuikaCz>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_counts: BTreeMap<String, u64>,
}

impl Observation {
    pub fn new(games: u64) -> Self {
        Self {
            games,
            ..Self::default()
        }
    }

    pub fn with_big(mut self, count: u64) -> Self {
        self.big_count = Some(count);
        self
    }

    pub fn with_total(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    pub fn with_grape(mut self, count: u64) -> Self {
        self.grape_count = Some(count);
        self
    }

    pub fn with_suika_cz(mut self, trials: u64, hits: u64) -> Self {
        self.suika_cz = Some(SuikaCz { trials, hits });
        self
    }

    pub fn with_extra(mut self, id: impl Into<String>, count: u64) -> Self {
        self.extra_counts.insert(id.into(), count);
        self
    }

    /// Build from the counters a player reads off the data display.
    ///
    /// `total = big + reg`. Zero BIG, zero total, and zero grape are treated
    /// as "not counted" rather than as observed zeros, matching how the
    /// counters are entered at the hall.
    pub fn from_counters(games: u64, big: u64, reg: u64, grape: Option<u64>) -> Self {
        let total = big.saturating_add(reg);
        Self {
            games,
            big_count: (big > 0).then_some(big),
            total_count: (total > 0).then_some(total),
            grape_count: grape.filter(|g| *g > 0),
            suika_cz: None,
            extra_counts: BTreeMap::new(),
        }
    }

    /// True if at least one counter is present.
    pub fn has_signals(&self) -> bool {
        self.big_count.is_some()
            || self.total_count.is_some()
            || self.grape_count.is_some()
            || self.suika_cz.is_some()
            || !self.extra_counts.is_empty()
    }

    /// REG-only count, when both BIG and total are known.
    pub fn reg_count(&self) -> Option<u64> {
        match (self.total_count, self.big_count) {
            (Some(total), Some(big)) => Some(total.saturating_sub(big)),
            (Some(total), None) => Some(total),
            _ => None,
        }
    }

    /// Observed "1 in N" rate for a count (`games / count`).
    pub fn observed_rate(&self, count: u64) -> Option<f64> {
        (count > 0 && self.games > 0).then(|| self.games as f64 / count as f64)
    }

    /// Check counts against `games`.
    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.games == 0 {
            return Err(EstimateError::NoGames);
        }
        let games = self.games;
        let check = |field: &str, count: Option<u64>| match count {
            Some(n) if n > games => Err(EstimateError::InvalidObservation {
                field: field.to_string(),
                message: format!("{n} exceeds games ({games})"),
            }),
            _ => Ok(()),
        };
        check("big_count", self.big_count)?;
        check("total_count", self.total_count)?;
        check("grape_count", self.grape_count)?;
        for (id, count) in &self.extra_counts {
            check(&format!("extra_counts.{id}"), Some(*count))?;
        }
        if let Some(SuikaCz { trials, hits }) = self.suika_cz {
            if hits > trials {
                return Err(EstimateError::InvalidObservation {
                    field: "suika_cz.hits".to_string(),
                    message: format!("{hits} exceeds suika trials ({trials})"),
                });
            }
        }
        if let (Some(big), Some(total)) = (self.big_count, self.total_count) {
            if big > total {
                return Err(EstimateError::InvalidObservation {
                    field: "big_count".to_string(),
                    message: format!("{big} exceeds total_count ({total})"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counters_drops_zeros() {
        let obs = Observation::from_counters(2000, 7, 5, None);
        assert_eq!(obs.big_count, Some(7));
        assert_eq!(obs.total_count, Some(12));
        assert_eq!(obs.grape_count, None);

        let obs = Observation::from_counters(300, 0, 0, Some(0));
        assert!(!obs.has_signals());

        let obs = Observation::from_counters(300, 0, 2, Some(50));
        assert_eq!(obs.big_count, None);
        assert_eq!(obs.total_count, Some(2));
        assert_eq!(obs.grape_count, Some(50));
    }

    #[test]
    fn reg_count_and_rate() {
        let obs = Observation::from_counters(2000, 7, 5, None);
        assert_eq!(obs.reg_count(), Some(5));
        let rate = obs.observed_rate(12).unwrap();
        assert!((rate - 166.666).abs() < 0.01);
        assert!(obs.observed_rate(0).is_none());
    }

    #[test]
    fn validate_rejects_zero_games() {
        assert_eq!(Observation::new(0).validate(), Err(EstimateError::NoGames));
    }

    #[test]
    fn validate_rejects_counts_above_games() {
        let err = Observation::new(10).with_total(11).validate().unwrap_err();
        assert!(err.to_string().contains("total_count"));

        let err = Observation::new(10)
            .with_extra("weak_cherry", 20)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("weak_cherry"));
    }

    #[test]
    fn validate_rejects_big_above_total() {
        let err = Observation::new(100)
            .with_big(5)
            .with_total(3)
            .validate()
            .unwrap_err();
        assert!(matches!(err, EstimateError::InvalidObservation { .. }));
    }

    #[test]
    fn validate_suika_cz_against_trials() {
        let err = Observation::new(1000)
            .with_suika_cz(10, 11)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("suika_cz.hits"));

        Observation::new(1000).with_suika_cz(15, 15).validate().unwrap();
        assert!(Observation::new(100).with_suika_cz(0, 0).has_signals());
    }

    #[test]
    fn validate_accepts_boundaries() {
        Observation::new(10)
            .with_big(0)
            .with_total(10)
            .with_grape(10)
            .validate()
            .unwrap();
    }
}
