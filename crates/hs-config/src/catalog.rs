//! Reference spec catalog types.
//!
//! A catalog lists machines; each machine maps every setting it supports to
//! a [`ReferenceSpec`] of published "1 in N" frequencies. The file layout is:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "machines": [
//!     {
//!       "name": "マイジャグラーV",
//!       "maker": "北電子",
//!       "settings": {
//!         "設定1": { "big": 273.1, "reg_total": 163.8, "grape": 5.90 },
//!         "設定6": { "big": 229.1, "reg_total": 114.6, "grape": 5.66 }
//!       }
//!     }
//!   ]
//! }
//! ```

use hs_common::{Error, Setting};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Published frequencies for one (machine, setting) pair, as "1 in N" spins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceSpec {
    /// Spins per BIG.
    pub big: f64,

    /// Spins per bonus of either kind (BIG+REG combined).
    pub reg_total: f64,

    /// Spins per grape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grape: Option<f64>,

    /// Chance that a suika wins a CZ, as a probability (not "1 in N").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suika_cz_rate: Option<f64>,

    /// Extra minor-role counters keyed by id (e.g. `weak_cherry`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,

    /// Machine payout percentage. Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_rate: Option<f64>,
}

impl ReferenceSpec {
    pub fn new(big: f64, reg_total: f64) -> Self {
        Self {
            big,
            reg_total,
            grape: None,
            suika_cz_rate: None,
            extras: BTreeMap::new(),
            payout_rate: None,
        }
    }

    pub fn with_grape(mut self, grape: f64) -> Self {
        self.grape = Some(grape);
        self
    }

    pub fn with_suika_cz_rate(mut self, p: f64) -> Self {
        self.suika_cz_rate = Some(p);
        self
    }

    pub fn with_extra(mut self, id: impl Into<String>, rate: f64) -> Self {
        self.extras.insert(id.into(), rate);
        self
    }

    pub fn with_payout_rate(mut self, rate: f64) -> Self {
        self.payout_rate = Some(rate);
        self
    }
}

/// Average medals paid per bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Payout {
    pub avg_big: i64,
    pub avg_reg: i64,
}

impl Default for Payout {
    fn default() -> Self {
        Self {
            avg_big: 252,
            avg_reg: 96,
        }
    }
}

/// One machine and its per-setting reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MachineSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,

    /// Overrides the catalog-wide payout for this machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<Payout>,

    #[serde(with = "setting_map")]
    #[schemars(with = "BTreeMap<String, ReferenceSpec>")]
    pub settings: BTreeMap<Setting, ReferenceSpec>,
}

impl MachineSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maker: None,
            payout: None,
            settings: BTreeMap::new(),
        }
    }

    pub fn with_maker(mut self, maker: impl Into<String>) -> Self {
        self.maker = Some(maker.into());
        self
    }

    pub fn with_setting(mut self, setting: Setting, spec: ReferenceSpec) -> Self {
        self.settings.insert(setting, spec);
        self
    }

    /// Settings carried by this machine, ascending.
    pub fn setting_list(&self) -> Vec<Setting> {
        self.settings.keys().copied().collect()
    }

    pub fn spec(&self, setting: Setting) -> Option<&ReferenceSpec> {
        self.settings.get(&setting)
    }
}

/// Simulation defaults shared by every machine in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForecastDefaults {
    pub n_sims: u32,
    pub payout: Payout,
    pub bet_per_game: i64,
    /// Offered future horizons, in spins.
    pub horizons: Vec<u64>,
    /// Histogram samples are clipped to ±this many medals.
    pub histogram_clip: i64,
}

impl Default for ForecastDefaults {
    fn default() -> Self {
        Self {
            n_sims: 2500,
            payout: Payout::default(),
            bet_per_game: 3,
            horizons: vec![500, 1000, 2000],
            histogram_clip: 3000,
        }
    }
}

/// A complete reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecCatalog {
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub forecast: ForecastDefaults,

    pub machines: Vec<MachineSpec>,
}

impl SpecCatalog {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Look up a machine by name (surrounding whitespace ignored).
    pub fn machine(&self, name: &str) -> Option<&MachineSpec> {
        let name = name.trim();
        self.machines.iter().find(|m| m.name == name)
    }

    pub fn require_machine(&self, name: &str) -> Result<&MachineSpec, Error> {
        self.machine(name).ok_or_else(|| Error::UnknownMachine {
            name: name.to_string(),
        })
    }

    pub fn machine_names(&self) -> impl Iterator<Item = &str> {
        self.machines.iter().map(|m| m.name.as_str())
    }

    /// Payout for a machine, falling back to the catalog default.
    pub fn payout_for(&self, machine: &MachineSpec) -> Payout {
        machine.payout.unwrap_or(self.forecast.payout)
    }
}

/// Settings maps are written with label keys ("設定1") but also accept the
/// short spellings `Setting` parses ("1", "s1").
mod setting_map {
    use super::ReferenceSpec;
    use hs_common::Setting;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Setting, ReferenceSpec>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (setting, spec) in map {
            out.serialize_entry(setting.label(), spec)?;
        }
        out.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Setting, ReferenceSpec>, D::Error> {
        let raw = BTreeMap::<String, ReferenceSpec>::deserialize(deserializer)?;
        let mut out = BTreeMap::new();
        for (key, spec) in raw {
            let setting = key.parse::<Setting>().map_err(D::Error::custom)?;
            if out.insert(setting, spec).is_some() {
                return Err(D::Error::custom(format!("duplicate setting {setting}")));
            }
        }
        Ok(out)
    }
}
