//! hallscope common types and errors.
//!
//! Shared by the config loader and the inference/forecast engine:
//! - The closed set of machine settings and observation signals
//! - The workspace error type with stable codes
//! - Output format selection

pub mod error;
pub mod output;
pub mod setting;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
pub use setting::{ParseSettingError, Setting, Signal};

/// Schema version stamped on every emitted report.
pub const SCHEMA_VERSION: &str = "1.0.0";
