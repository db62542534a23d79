//! Command reports: estimate, forecast, judge, machines, check.

use super::{one_in, pct, signed, Report, ReportHeader};
use crate::forecast::{histogram, ForecastParams, ForecastSummary, HistogramBin};
use crate::inference::{confidence, top_n, Contribution, Observation, SettingPosterior};
use hs_common::Setting;
use hs_config::{CatalogSnapshot, MachineSpec, Payout};
use serde::Serialize;

/// Width of the longest bar in a Markdown histogram.
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Rows shown in the judge report's headline.
pub const JUDGE_TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// Shared sections
// ---------------------------------------------------------------------------

/// Observed "1 in N" rates for each entered counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservedRates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grape: Option<f64>,
    /// CZ hits per suika, as a probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suika_cz: Option<f64>,
}

impl ObservedRates {
    pub fn from_observation(obs: &Observation) -> Self {
        let rate = |count: Option<u64>| count.and_then(|c| obs.observed_rate(c));
        Self {
            big: rate(obs.big_count),
            reg: rate(obs.reg_count()),
            total: rate(obs.total_count),
            grape: rate(obs.grape_count),
            suika_cz: obs
                .suika_cz
                .filter(|cz| cz.trials > 0)
                .map(|cz| cz.hits as f64 / cz.trials as f64),
        }
    }
}

/// Observation plus the full posterior.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateSection {
    pub observation: Observation,
    /// Sample-size heuristic in `[0, 1]`.
    pub confidence: f64,
    pub observed: ObservedRates,
    /// Every candidate setting, most likely first.
    pub posterior: Vec<SettingPosterior>,
}

impl EstimateSection {
    pub fn new(observation: Observation, posterior: Vec<SettingPosterior>) -> Self {
        Self {
            confidence: confidence(observation.games),
            observed: ObservedRates::from_observation(&observation),
            observation,
            posterior,
        }
    }

    pub fn best(&self) -> Option<&SettingPosterior> {
        self.posterior.first()
    }

    fn markdown(&self) -> String {
        let obs = &self.observation;
        let count = |c: Option<u64>| c.map_or_else(|| "-".to_string(), |c| c.to_string());
        let rate = |r: Option<f64>| r.map_or_else(|| "-".to_string(), one_in);

        let mut out = String::new();
        out.push_str("| | Games | BIG | REG | BIG+REG | Grape |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        out.push_str(&format!(
            "| Count | {} | {} | {} | {} | {} |\n",
            obs.games,
            count(obs.big_count),
            count(obs.reg_count()),
            count(obs.total_count),
            count(obs.grape_count),
        ));
        out.push_str(&format!(
            "| Rate | | {} | {} | {} | {} |\n",
            rate(self.observed.big),
            rate(self.observed.reg),
            rate(self.observed.total),
            rate(self.observed.grape),
        ));
        for (id, n) in &obs.extra_counts {
            out.push_str(&format!("\nExtra `{id}`: {n}"));
            if let Some(r) = obs.observed_rate(*n) {
                out.push_str(&format!(" ({})", one_in(r)));
            }
            out.push('\n');
        }
        if let Some(cz) = obs.suika_cz {
            out.push_str(&format!("\nSuika CZ: {}/{}", cz.hits, cz.trials));
            if let Some(p) = self.observed.suika_cz {
                out.push_str(&format!(" ({})", pct(p)));
            }
            out.push('\n');
        }
        out.push_str(&format!("\nConfidence: {}\n\n", pct(self.confidence)));

        out.push_str("| Rank | Setting | Probability | Gap | log p |\n");
        out.push_str("|------|---------|-------------|-----|-------|\n");
        for (i, row) in self.posterior.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} | {:.2} | {:.3} |\n",
                i + 1,
                row.setting,
                pct(row.prob),
                row.gap,
                row.logp
            ));
        }

        if let Some(best) = self.best() {
            out.push_str(&contribution_markdown(best));
        }
        out
    }

    fn summary(&self) -> String {
        let ranking: Vec<String> = top_n(&self.posterior, JUDGE_TOP_N)
            .iter()
            .map(|row| format!("{} {}", row.setting, pct(row.prob)))
            .collect();
        format!(
            "{}G: {} (confidence {})",
            self.observation.games,
            ranking.join(", "),
            pct(self.confidence)
        )
    }
}

fn contribution_markdown(row: &SettingPosterior) -> String {
    let Some(contrib) = row.contrib_pct.as_deref() else {
        return String::new();
    };
    let mut out = format!("\n## Contribution ({})\n\n", row.setting);
    if contrib.is_empty() {
        out.push_str("No counters entered; the ranking is the prior.\n");
    }
    for c in contrib {
        out.push_str(&format!("- {}: {:.1}%\n", c.signal.label(), c.pct));
    }
    out
}

/// Percentile bands of a forecast, without the raw samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBands {
    pub mean: f64,
    pub median: f64,
    pub p05: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    pub min: i64,
    pub max: i64,
    pub n_sims: usize,
}

impl From<&ForecastSummary> for ForecastBands {
    fn from(s: &ForecastSummary) -> Self {
        Self {
            mean: s.mean,
            median: s.median,
            p05: s.p05,
            p25: s.p25,
            p75: s.p75,
            p95: s.p95,
            min: s.min().unwrap_or_default(),
            max: s.max().unwrap_or_default(),
            n_sims: s.diffs.len(),
        }
    }
}

/// Forecast parameters, bands and histogram.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSection {
    pub params: ForecastParams,
    /// Seed used for the run, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub bands: ForecastBands,
    pub histogram_clip: i64,
    pub histogram_bin: i64,
    pub histogram: Vec<HistogramBin>,
}

impl ForecastSection {
    /// Summarize a forecast, clipping the histogram to `±clip`.
    pub fn new(
        params: ForecastParams,
        seed: Option<u64>,
        summary: &ForecastSummary,
        clip: i64,
        bin_width: i64,
    ) -> Self {
        let clip = clip.abs();
        let bin_width = bin_width.max(1);
        Self {
            params,
            seed,
            bands: ForecastBands::from(summary),
            histogram_clip: clip,
            histogram_bin: bin_width,
            histogram: histogram(&summary.diffs, -clip, clip, bin_width),
        }
    }

    fn markdown(&self) -> String {
        let b = &self.bands;
        let mut out = format!(
            "Next {}G, {} simulations, bet {} per game\n\n",
            self.params.games_future, b.n_sims, self.params.bet_per_game
        );
        out.push_str("| Mean | p05 | p25 | Median | p75 | p95 |\n");
        out.push_str("|------|-----|-----|--------|-----|-----|\n");
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            signed(b.mean),
            signed(b.p05),
            signed(b.p25),
            signed(b.median),
            signed(b.p75),
            signed(b.p95)
        ));

        let peak = self.histogram.iter().map(|bin| bin.count).max().unwrap_or(0);
        if peak > 0 {
            out.push_str(&format!(
                "\nHistogram (bin {}, clipped to ±{})\n\n```\n",
                self.histogram_bin, self.histogram_clip
            ));
            for bin in &self.histogram {
                let len = (bin.count * HISTOGRAM_BAR_WIDTH).div_ceil(peak);
                out.push_str(&format!(
                    "{:>7} | {:<width$} {}\n",
                    bin.lo,
                    "#".repeat(len),
                    bin.count,
                    width = HISTOGRAM_BAR_WIDTH
                ));
            }
            out.push_str("```\n");
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "+{}G median {} (p05 {}, p95 {})",
            self.params.games_future,
            signed(self.bands.median),
            signed(self.bands.p05),
            signed(self.bands.p95)
        )
    }
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub machine: String,
    pub catalog: CatalogSnapshot,
    #[serde(flatten)]
    pub estimate: EstimateSection,
}

impl Report for EstimateReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        format!(
            "# Setting estimate: {}\n\n{}\nRun: {}\n",
            self.machine,
            self.estimate.markdown(),
            self.header.run_id
        )
    }

    fn summary(&self) -> String {
        format!(
            "[{}] {} {}",
            self.header.run_id,
            self.machine,
            self.estimate.summary()
        )
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub machine: String,
    pub catalog: CatalogSnapshot,
    pub observation: Observation,
    /// Setting mix the simulation drew from.
    pub setting_mix: Vec<TopEntry>,
    pub forecast: ForecastSection,
}

impl Report for ForecastReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        let mix: Vec<String> = self
            .setting_mix
            .iter()
            .map(|e| format!("{} {}", e.setting, pct(e.prob)))
            .collect();
        format!(
            "# Forecast: {}\n\nAfter {}G; setting mix: {}\n\n{}\nRun: {}\n",
            self.machine,
            self.observation.games,
            mix.join(", "),
            self.forecast.markdown(),
            self.header.run_id
        )
    }

    fn summary(&self) -> String {
        format!(
            "[{}] {} {}",
            self.header.run_id,
            self.machine,
            self.forecast.summary()
        )
    }
}

// ---------------------------------------------------------------------------
// Judge
// ---------------------------------------------------------------------------

/// One headline row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub setting: Setting,
    pub prob: f64,
}

impl From<&SettingPosterior> for TopEntry {
    fn from(row: &SettingPosterior) -> Self {
        Self {
            setting: row.setting,
            prob: row.prob,
        }
    }
}

/// Estimate and forecast in one report.
#[derive(Debug, Clone, Serialize)]
pub struct JudgeReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub machine: String,
    pub catalog: CatalogSnapshot,
    pub top: Vec<TopEntry>,
    /// Signal shares behind the leading setting.
    pub contribution: Vec<Contribution>,
    #[serde(flatten)]
    pub estimate: EstimateSection,
    pub forecast: ForecastSection,
}

impl JudgeReport {
    pub fn new(
        header: ReportHeader,
        machine: impl Into<String>,
        catalog: CatalogSnapshot,
        estimate: EstimateSection,
        forecast: ForecastSection,
    ) -> Self {
        Self {
            header,
            machine: machine.into(),
            catalog,
            top: top_n(&estimate.posterior, JUDGE_TOP_N)
                .iter()
                .map(TopEntry::from)
                .collect(),
            contribution: estimate
                .best()
                .and_then(|row| row.contrib_pct.clone())
                .unwrap_or_default(),
            estimate,
            forecast,
        }
    }
}

impl Report for JudgeReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        let mut out = format!("# Judge: {}\n\n", self.machine);
        for (i, entry) in self.top.iter().enumerate() {
            out.push_str(&format!("{}. **{}** {}\n", i + 1, entry.setting, pct(entry.prob)));
        }
        out.push('\n');
        out.push_str(&self.estimate.markdown());
        out.push_str("\n## Forecast\n\n");
        out.push_str(&self.forecast.markdown());
        out.push_str(&format!("\nRun: {}\n", self.header.run_id));
        out
    }

    fn summary(&self) -> String {
        format!(
            "[{}] {} {}; {}",
            self.header.run_id,
            self.machine,
            self.estimate.summary(),
            self.forecast.summary()
        )
    }
}

// ---------------------------------------------------------------------------
// Machines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MachineEntry {
    #[serde(flatten)]
    pub spec: MachineSpec,
    /// Payout used for forecasts on this machine.
    pub effective_payout: Payout,
}

#[derive(Debug, Clone, Serialize)]
pub struct MachinesReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub catalog: CatalogSnapshot,
    pub machines: Vec<MachineEntry>,
}

impl Report for MachinesReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        let mut out = String::from("# Machines\n\n");
        out.push_str(&format!(
            "Catalog: {} ({})\n",
            self.catalog.path.as_deref().unwrap_or("built-in"),
            self.catalog.source
        ));
        for entry in &self.machines {
            let spec = &entry.spec;
            out.push_str(&format!("\n## {}\n\n", spec.name));
            if let Some(maker) = &spec.maker {
                out.push_str(&format!("Maker: {maker}\n\n"));
            }
            out.push_str("| Setting | BIG | BIG+REG | Grape | Payout |\n");
            out.push_str("|---------|-----|---------|-------|--------|\n");
            for (setting, r) in &spec.settings {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    setting,
                    one_in(r.big),
                    one_in(r.reg_total),
                    r.grape.map_or_else(|| "-".to_string(), one_in),
                    r.payout_rate
                        .map_or_else(|| "-".to_string(), |p| format!("{p:.1}%"))
                ));
            }
            out.push_str(&format!(
                "\nAverage payout: BIG {} / REG {}\n",
                entry.effective_payout.avg_big, entry.effective_payout.avg_reg
            ));
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "[{}] {} machine(s) from {}",
            self.header.run_id,
            self.machines.len(),
            self.catalog.source
        )
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn ok(check: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            status: CheckStatus::Ok,
            note: Some(note.into()),
            error: None,
        }
    }

    pub fn info(check: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Info,
            ..Self::ok(check, note)
        }
    }

    pub fn error(check: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            status: CheckStatus::Error,
            note: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub status: CheckStatus,
    pub checks: Vec<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogSnapshot>,
}

impl CheckReport {
    pub fn new(
        header: ReportHeader,
        checks: Vec<CheckResult>,
        catalog: Option<CatalogSnapshot>,
    ) -> Self {
        let status = if checks.iter().any(|c| c.status == CheckStatus::Error) {
            CheckStatus::Error
        } else {
            CheckStatus::Ok
        };
        Self {
            header,
            status,
            checks,
            catalog,
        }
    }

    pub fn all_ok(&self) -> bool {
        self.status != CheckStatus::Error
    }
}

impl Report for CheckReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        let mut out = String::from("# hallscope check\n\n");
        for result in &self.checks {
            let symbol = match result.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Info => "ℹ",
                CheckStatus::Error => "✗",
            };
            out.push_str(&format!("{} {}\n", symbol, result.check));
            if let Some(note) = &result.note {
                out.push_str(&format!("  {note}\n"));
            }
            if let Some(error) = &result.error {
                out.push_str(&format!("  Error: {error}\n"));
            }
        }
        if let Some(snapshot) = &self.catalog {
            out.push_str(&format!(
                "\nCatalog hash: {}\nMachines: {}\n",
                snapshot.hash,
                snapshot.machines.join(", ")
            ));
        }
        out.push_str(&format!("\nRun: {}\n", self.header.run_id));
        out
    }

    fn summary(&self) -> String {
        let status = if self.all_ok() { "OK" } else { "FAILED" };
        format!("[{}] check: {}", self.header.run_id, status)
    }
}
