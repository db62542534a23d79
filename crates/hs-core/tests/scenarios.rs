//! End-to-end scenarios through the library API: catalog → estimate → forecast → report.

use hs_common::{Setting, Signal};
use hs_core::config::{load_catalog_from_file, ResolvedCatalog};
use hs_core::forecast::{forecast_diff_medal, resolve_games_future, ForecastParams};
use hs_core::inference::{
    checked_estimate, estimate_setting_probs, EstimateError, EstimateOptions, Observation,
    SettingPosterior,
};
use hs_core::output::{EstimateSection, ForecastSection, JudgeReport, Report, ReportHeader};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

const MY_JUGGLER: &str = "マイジャグラーV";

fn builtin() -> ResolvedCatalog {
    ResolvedCatalog::builtin()
}

#[test]
fn short_session_with_few_bonuses_points_low() {
    let resolved = builtin();
    let machine = resolved.catalog.require_machine(MY_JUGGLER).unwrap();
    let obs = Observation::from_counters(2000, 7, 5, None);

    let rows = checked_estimate(&machine.settings, &obs, &EstimateOptions::default()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].setting, Setting::S1);
    assert!(rows[0].prob > rows[5].prob);

    let contrib = rows[0].contrib_pct.as_ref().unwrap();
    let signals: Vec<&Signal> = contrib.iter().map(|c| &c.signal).collect();
    assert!(signals.contains(&&Signal::Total));
    assert!(signals.contains(&&Signal::Big));
}

#[test]
fn estimate_is_bit_reproducible_without_a_seed() {
    let resolved = builtin();
    let machine = resolved.catalog.require_machine(MY_JUGGLER).unwrap();
    let obs = Observation::from_counters(2000, 7, 5, None);
    let bits = |rows: &[SettingPosterior]| -> Vec<(Setting, u64, u64, u64)> {
        rows.iter()
            .map(|r| (r.setting, r.logp.to_bits(), r.prob.to_bits(), r.gap.to_bits()))
            .collect()
    };

    let first = estimate_setting_probs(&machine.settings, &obs, &EstimateOptions::default());
    let first_json = serde_json::to_string(&first).unwrap();
    for _ in 0..5 {
        let again = estimate_setting_probs(&machine.settings, &obs, &EstimateOptions::default());
        assert_eq!(again, first);
        assert_eq!(bits(&again), bits(&first));
        assert_eq!(serde_json::to_string(&again).unwrap(), first_json);
    }

    let rank = |s: Setting| first.iter().position(|r| r.setting == s).unwrap();
    assert_eq!(rank(Setting::S1), 0);
    assert_eq!(rank(Setting::S6), 5);
}

#[test]
fn long_session_at_high_bonus_rate_points_high() {
    let resolved = builtin();
    let machine = resolved.catalog.require_machine(MY_JUGGLER).unwrap();
    let obs = Observation::from_counters(4000, 18, 18, None);

    let rows = estimate_setting_probs(&machine.settings, &obs, &EstimateOptions::default());
    assert_eq!(rows[0].setting, Setting::S6);
}

#[test]
fn zero_games_has_no_estimate() {
    let resolved = builtin();
    let machine = resolved.catalog.require_machine(MY_JUGGLER).unwrap();
    let obs = Observation::from_counters(0, 0, 0, None);

    assert!(estimate_setting_probs(&machine.settings, &obs, &EstimateOptions::default()).is_empty());
    assert_eq!(
        checked_estimate(&machine.settings, &obs, &EstimateOptions::default()),
        Err(EstimateError::NoGames)
    );
}

#[test]
fn judge_flow_is_reproducible_with_a_seed() {
    let resolved = builtin();
    let machine = resolved.catalog.require_machine(MY_JUGGLER).unwrap();
    let obs = Observation::from_counters(2000, 7, 5, Some(340));
    let rows = checked_estimate(&machine.settings, &obs, &EstimateOptions::default()).unwrap();

    let payout = resolved.catalog.payout_for(machine);
    let games_future =
        resolve_games_future(&resolved.catalog.forecast, Some(1000), None).unwrap();
    let mut params = ForecastParams::from_defaults(&resolved.catalog.forecast, games_future);
    params.avg_big_payout = payout.avg_big;
    params.avg_reg_payout = payout.avg_reg;
    let params = params.with_sims(800);

    let run = |seed| {
        forecast_diff_medal(&rows, &machine.settings, &params, &mut StdRng::seed_from_u64(seed))
            .unwrap()
    };
    let first = run(2024);
    assert_eq!(first, run(2024));
    // Only bonuses pay out in the simulation.
    assert!(first.mean < 0.0);

    let section = ForecastSection::new(params, Some(2024), &first, 3000, 100);
    let report = JudgeReport::new(
        ReportHeader::new("run-scenario"),
        machine.name.clone(),
        resolved.snapshot(),
        EstimateSection::new(obs, rows),
        section,
    );
    assert_eq!(report.top.len(), 3);
    assert_eq!(report.top[0].setting, Setting::S1);
    assert!(!report.contribution.is_empty());
    assert_eq!(
        report.forecast.histogram.iter().map(|b| b.count).sum::<usize>(),
        800
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["machine"], MY_JUGGLER);
    assert_eq!(json["forecast"]["seed"], 2024);
    assert_eq!(json["forecast"]["params"]["games_future"], 1000);
    assert!(report.summary().starts_with("[run-scenario] マイジャグラーV 2000G:"));
}

#[test]
fn catalog_file_with_extra_signal() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "schema_version": "1.0.0",
            "machines": [{{
                "name": "チェリー機",
                "settings": {{
                    "1": {{ "big": 280.0, "reg_total": 170.0, "extras": {{ "cherry": 40.0 }} }},
                    "6": {{ "big": 230.0, "reg_total": 115.0, "extras": {{ "cherry": 30.0 }} }}
                }}
            }}]
        }}"#
    )
    .unwrap();

    let (catalog, hash) = load_catalog_from_file(file.path()).unwrap();
    assert_eq!(hash.len(), 64);
    let machine = catalog.require_machine("チェリー機").unwrap();

    let obs = Observation::new(3000).with_extra("cherry", 100);
    let rows = estimate_setting_probs(&machine.settings, &obs, &EstimateOptions::default());
    assert_eq!(rows[0].setting, Setting::S6);
    assert!(rows.iter().all(|r| r.ll_extras.contains_key("cherry")));

    let contrib = rows[0].contrib_pct.as_ref().unwrap();
    assert_eq!(contrib.len(), 1);
    assert_eq!(contrib[0].signal, Signal::Extra("cherry".into()));
    assert!((contrib[0].pct - 100.0).abs() < 1e-9);
}
