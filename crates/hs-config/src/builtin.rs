//! Built-in reference catalog.
//!
//! Published BIG / combined-bonus / payout figures for the current Juggler
//! lineup. Grape rates are included only where they are published.

use crate::catalog::{ForecastDefaults, MachineSpec, ReferenceSpec, SpecCatalog};
use crate::CONFIG_SCHEMA_VERSION;
use hs_common::Setting;

/// (big, reg_total, payout_rate) per setting, 設定1..設定6.
type Row = (f64, f64, f64);

const MY_JUGGLER_V: [Row; 6] = [
    (273.1, 163.8, 97.0),
    (270.8, 159.1, 98.0),
    (266.4, 148.6, 99.9),
    (254.0, 135.4, 102.8),
    (240.1, 126.8, 105.3),
    (229.1, 114.6, 109.4),
];
const MY_JUGGLER_V_GRAPE: [f64; 6] = [5.90, 5.86, 5.82, 5.78, 5.74, 5.66];

const IM_JUGGLER_EX: [Row; 6] = [
    (273.1, 168.5, 97.0),
    (269.7, 161.0, 98.0),
    (269.7, 148.6, 99.5),
    (259.0, 142.2, 101.1),
    (259.0, 128.5, 103.3),
    (255.0, 127.5, 105.5),
];
const IM_JUGGLER_EX_GRAPE: [f64; 6] = [6.02, 6.02, 6.02, 6.02, 6.02, 5.78];

const FUNKY_JUGGLER_2: [Row; 6] = [
    (266.4, 165.9, 97.0),
    (259.0, 158.3, 98.5),
    (256.0, 150.7, 99.8),
    (249.2, 140.6, 102.0),
    (240.1, 133.2, 104.3),
    (219.9, 119.6, 109.0),
];
const FUNKY_JUGGLER_2_GRAPE: [f64; 6] = [5.90, 5.86, 5.82, 5.78, 5.74, 5.66];

const ULTRA_MIRACLE_JUGGLER: [Row; 6] = [
    (267.5, 164.3, 97.0),
    (261.1, 158.3, 98.1),
    (256.0, 147.9, 99.8),
    (242.7, 138.6, 102.1),
    (233.2, 130.8, 104.5),
    (216.3, 121.6, 108.1),
];

const JUGGLER_GIRLS_SS: [Row; 6] = [
    (273.1, 159.1, 97.0),
    (270.8, 152.8, 97.9),
    (260.1, 142.8, 99.9),
    (250.1, 132.4, 102.1),
    (243.6, 128.3, 104.4),
    (226.0, 119.2, 107.5),
];

const GOGO_JUGGLER_3: [Row; 6] = [
    (259.0, 149.6, 97.2),
    (258.0, 145.3, 98.2),
    (257.0, 139.7, 99.4),
    (254.0, 130.5, 101.6),
    (247.3, 123.7, 103.8),
    (234.9, 117.4, 106.5),
];

fn machine(name: &str, rows: &[Row; 6], grape: Option<&[f64; 6]>) -> MachineSpec {
    let mut spec = MachineSpec::new(name).with_maker("北電子");
    for (i, (setting, &(big, reg_total, payout_rate))) in
        Setting::ALL.iter().zip(rows.iter()).enumerate()
    {
        let mut reference = ReferenceSpec::new(big, reg_total).with_payout_rate(payout_rate);
        if let Some(grape) = grape {
            reference = reference.with_grape(grape[i]);
        }
        spec = spec.with_setting(*setting, reference);
    }
    spec
}

/// The catalog used when no catalog file is configured.
pub fn builtin_catalog() -> SpecCatalog {
    SpecCatalog {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        description: Some("built-in Juggler catalog".to_string()),
        forecast: ForecastDefaults::default(),
        machines: vec![
            machine("マイジャグラーV", &MY_JUGGLER_V, Some(&MY_JUGGLER_V_GRAPE)),
            machine("SアイムジャグラーEX", &IM_JUGGLER_EX, Some(&IM_JUGGLER_EX_GRAPE)),
            machine(
                "ファンキージャグラー2",
                &FUNKY_JUGGLER_2,
                Some(&FUNKY_JUGGLER_2_GRAPE),
            ),
            machine("ウルトラミラクルジャグラー", &ULTRA_MIRACLE_JUGGLER, None),
            machine("ジャグラーガールズSS", &JUGGLER_GIRLS_SS, None),
            machine("ゴーゴージャグラー3", &GOGO_JUGGLER_3, None),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_catalog;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin_catalog();
        validate_catalog(&catalog).unwrap();
        assert_eq!(catalog.machines.len(), 6);
    }

    #[test]
    fn every_builtin_machine_has_six_settings() {
        for machine in builtin_catalog().machines {
            assert_eq!(machine.setting_list(), Setting::ALL.to_vec(), "{}", machine.name);
        }
    }

    #[test]
    fn combined_rate_is_more_frequent_than_big() {
        for machine in builtin_catalog().machines {
            for (setting, spec) in &machine.settings {
                assert!(
                    spec.reg_total < spec.big,
                    "{} {setting}: reg_total {} >= big {}",
                    machine.name,
                    spec.reg_total,
                    spec.big
                );
            }
        }
    }

    #[test]
    fn my_juggler_has_grape() {
        let catalog = builtin_catalog();
        let machine = catalog.machine("マイジャグラーV").unwrap();
        assert_eq!(machine.spec(Setting::S6).unwrap().grape, Some(5.66));
        assert_eq!(machine.spec(Setting::S1).unwrap().reg_total, 163.8);
    }
}
