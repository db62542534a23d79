//! Machine settings and observation signals.
//!
//! A machine runs under exactly one hidden setting from a small ordered set.
//! Reference tables, priors and posteriors are all keyed by [`Setting`], so a
//! table cannot carry a label outside that set.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Payout configuration tier, lowest (1) to highest (6).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Setting {
    #[serde(rename = "設定1")]
    S1,
    #[serde(rename = "設定2")]
    S2,
    #[serde(rename = "設定3")]
    S3,
    #[serde(rename = "設定4")]
    S4,
    #[serde(rename = "設定5")]
    S5,
    #[serde(rename = "設定6")]
    S6,
}

impl Setting {
    /// Every setting, in ascending order.
    pub const ALL: [Setting; 6] = [
        Setting::S1,
        Setting::S2,
        Setting::S3,
        Setting::S4,
        Setting::S5,
        Setting::S6,
    ];

    /// Tier number, 1..=6.
    pub fn tier(self) -> u8 {
        match self {
            Setting::S1 => 1,
            Setting::S2 => 2,
            Setting::S3 => 3,
            Setting::S4 => 4,
            Setting::S5 => 5,
            Setting::S6 => 6,
        }
    }

    pub fn from_tier(tier: u8) -> Option<Setting> {
        Setting::ALL.get(usize::from(tier).checked_sub(1)?).copied()
    }

    /// Display label used by reference tables ("設定N").
    pub fn label(self) -> &'static str {
        match self {
            Setting::S1 => "設定1",
            Setting::S2 => "設定2",
            Setting::S3 => "設定3",
            Setting::S4 => "設定4",
            Setting::S5 => "設定5",
            Setting::S6 => "設定6",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown setting '{0}' (expected 1-6, s1-s6, or 設定1-設定6)")]
pub struct ParseSettingError(pub String);

impl FromStr for Setting {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("設定")
            .or_else(|| trimmed.strip_prefix('s'))
            .or_else(|| trimmed.strip_prefix('S'))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Setting::from_tier)
            .ok_or_else(|| ParseSettingError(s.to_string()))
    }
}

/// An observed counter that contributes a likelihood term.
///
/// Serialized as `total`, `big`, `grape`, `suika_cz`, or `extra:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Signal {
    /// Combined BIG+REG count.
    Total,
    /// BIG-only count.
    Big,
    /// Grape (minor symbol) count.
    Grape,
    /// CZ wins out of suika trials.
    SuikaCz,
    /// A named extra minor-role counter.
    Extra(String),
}

impl Signal {
    /// Display label for reports.
    pub fn label(&self) -> &str {
        match self {
            Signal::Total => "合算",
            Signal::Big => "BIG",
            Signal::Grape => "ブドウ",
            Signal::SuikaCz => "スイカCZ",
            Signal::Extra(id) => id,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Total => f.write_str("total"),
            Signal::Big => f.write_str("big"),
            Signal::Grape => f.write_str("grape"),
            Signal::SuikaCz => f.write_str("suika_cz"),
            Signal::Extra(id) => write!(f, "extra:{id}"),
        }
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        signal.to_string()
    }
}

impl TryFrom<String> for Signal {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "total" => Ok(Signal::Total),
            "big" => Ok(Signal::Big),
            "grape" => Ok(Signal::Grape),
            "suika_cz" => Ok(Signal::SuikaCz),
            other => match other.strip_prefix("extra:") {
                Some(id) if !id.is_empty() => Ok(Signal::Extra(id.to_string())),
                _ => Err(format!("unknown signal: {value}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_parses_all_spellings() {
        assert_eq!("3".parse::<Setting>().unwrap(), Setting::S3);
        assert_eq!("s6".parse::<Setting>().unwrap(), Setting::S6);
        assert_eq!("S1".parse::<Setting>().unwrap(), Setting::S1);
        assert_eq!("設定5".parse::<Setting>().unwrap(), Setting::S5);
        assert_eq!(" 2 ".parse::<Setting>().unwrap(), Setting::S2);
    }

    #[test]
    fn setting_rejects_out_of_range() {
        assert!("0".parse::<Setting>().is_err());
        assert!("7".parse::<Setting>().is_err());
        assert!("設定".parse::<Setting>().is_err());
        assert!("high".parse::<Setting>().is_err());
    }

    #[test]
    fn setting_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Setting::S4).unwrap(), "\"設定4\"");
        let back: Setting = serde_json::from_str("\"設定4\"").unwrap();
        assert_eq!(back, Setting::S4);
    }

    #[test]
    fn setting_order_follows_tier() {
        assert!(Setting::S1 < Setting::S6);
        for (i, s) in Setting::ALL.iter().enumerate() {
            assert_eq!(usize::from(s.tier()), i + 1);
            assert_eq!(Setting::from_tier(s.tier()), Some(*s));
        }
        assert_eq!(Setting::from_tier(0), None);
    }

    #[test]
    fn signal_string_form() {
        assert_eq!(serde_json::to_string(&Signal::Total).unwrap(), "\"total\"");
        assert_eq!(
            serde_json::to_string(&Signal::Extra("cherry".into())).unwrap(),
            "\"extra:cherry\""
        );
        let back: Signal = serde_json::from_str("\"extra:cherry\"").unwrap();
        assert_eq!(back, Signal::Extra("cherry".into()));
        assert!(serde_json::from_str::<Signal>("\"extra:\"").is_err());
        let back: Signal = serde_json::from_str("\"suika_cz\"").unwrap();
        assert_eq!(back, Signal::SuikaCz);
    }

    #[test]
    fn signal_order_is_priority_order() {
        assert!(Signal::Total < Signal::Big);
        assert!(Signal::Big < Signal::Grape);
        assert!(Signal::Grape < Signal::SuikaCz);
        assert!(Signal::SuikaCz < Signal::Extra("a".into()));
    }
}
