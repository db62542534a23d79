//! Report rendering for CLI output.
//!
//! Every command result is a serializable report. JSON is the report itself;
//! Markdown and the one-line summary are rendered from the same struct so the
//! three formats cannot drift apart.

pub mod errors;
pub mod reports;

pub use errors::{ErrorBody, ErrorReport};
pub use reports::{
    CheckReport, CheckResult, CheckStatus, EstimateReport, EstimateSection, ForecastBands,
    ForecastReport, ForecastSection, JudgeReport, MachineEntry, MachinesReport, ObservedRates,
    TopEntry,
};

use chrono::{DateTime, Utc};
use hs_common::{OutputFormat, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

/// Fields stamped on every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportHeader {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            generated_at: Utc::now(),
        }
    }
}

/// A report that can be rendered in every [`OutputFormat`].
pub trait Report: Serialize {
    fn header(&self) -> &ReportHeader;

    /// Human-readable Markdown.
    fn markdown(&self) -> String;

    /// Single line, prefixed with the run id.
    fn summary(&self) -> String;
}

/// Render a report in the requested format.
pub fn render<R: Report>(report: &R, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Md => Ok(report.markdown()),
        OutputFormat::Summary => Ok(report.summary()),
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `0.4123` → `41.2%`.
pub(crate) fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// `166.67` → `1/166.7`.
pub(crate) fn one_in(rate: f64) -> String {
    format!("1/{rate:.1}")
}

/// Medal difference with an explicit sign.
pub(crate) fn signed(v: f64) -> String {
    format!("{:+.0}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_format_values() {
        assert_eq!(pct(0.41234), "41.2%");
        assert_eq!(pct(1.0), "100.0%");
        assert_eq!(one_in(166.666), "1/166.7");
        assert_eq!(signed(120.4), "+120");
        assert_eq!(signed(-35.0), "-35");
    }

    #[test]
    fn header_carries_schema_version() {
        let header = ReportHeader::new("run-abc");
        assert_eq!(header.schema_version, SCHEMA_VERSION);
        assert_eq!(header.run_id, "run-abc");
    }
}
