//! Error types for hallscope.
//!
//! Every error carries a stable numeric code and a category so that callers
//! (the CLI, or a UI embedding the engine) can branch without string matching.
//! Codes are grouped:
//! - 10-19: Configuration errors
//! - 30-39: Inference errors
//! - 40-49: Forecast errors
//! - 60-69: I/O errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hallscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Reference table, prior, or weight configuration.
    Config,
    /// Setting estimation.
    Inference,
    /// Payout simulation.
    Forecast,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Forecast => write!(f, "forecast"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for hallscope.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown machine: {name}")]
    UnknownMachine { name: String },

    #[error("invalid spec table: {0}")]
    InvalidSpec(String),

    // Inference errors (30-39)
    #[error("cannot estimate: {0}")]
    NoEstimate(String),

    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    // Forecast errors (40-49)
    #[error("forecast failed: {0}")]
    Forecast(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable error code.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnknownMachine { .. } => 11,
            Error::InvalidSpec(_) => 12,
            Error::NoEstimate(_) => 30,
            Error::InvalidObservation(_) => 31,
            Error::Forecast(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::UnknownMachine { .. } | Error::InvalidSpec(_) => {
                ErrorCategory::Config
            }
            Error::NoEstimate(_) | Error::InvalidObservation(_) => ErrorCategory::Inference,
            Error::Forecast(_) => ErrorCategory::Forecast,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the user can fix this by changing inputs or configuration.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::UnknownMachine { .. } | Error::InvalidSpec(_) => true,
            Error::NoEstimate(_) | Error::InvalidObservation(_) => true,
            // A forecast failure after a successful estimate means the spec
            // table and posterior disagree.
            Error::Forecast(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Run 'hallscope check' to validate the configuration.",
            Error::UnknownMachine { .. } => {
                "Run 'hallscope machines' to list the machines in the active catalog."
            }
            Error::InvalidSpec(_) => {
                "Every rate must be a positive '1 in N' value of at least 1. Fix the catalog file."
            }
            Error::NoEstimate(_) => "Enter a total game count greater than zero.",
            Error::InvalidObservation(_) => {
                "Counts must not exceed the game count, and BIG must not exceed BIG+REG."
            }
            Error::Forecast(_) => "Report this with the catalog file and the inputs used.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Check the JSON syntax of the input file.",
        }
    }
}
