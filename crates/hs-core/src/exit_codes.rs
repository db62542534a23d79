//! Exit codes for the hallscope CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use hs_common::{Error, ErrorCategory};

/// Exit codes for hallscope commands.
///
/// These codes are a stable contract for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Success (0)
    // ========================================================================
    /// Report produced
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments or observation counts
    ArgsError = 10,

    /// Catalog could not be loaded or failed validation
    ConfigError = 11,

    /// Nothing to estimate (zero games or no candidate settings)
    NoEstimate = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19. These can be resolved by user action.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20-29. These indicate bugs and should be reported.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::NoEstimate => "ERR_NO_ESTIMATE",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a workspace error.
    pub fn for_error(error: &Error) -> Self {
        match error {
            Error::NoEstimate(_) => ExitCode::NoEstimate,
            Error::InvalidObservation(_) | Error::UnknownMachine { .. } => ExitCode::ArgsError,
            Error::Io(_) => ExitCode::IoError,
            _ => match error.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Inference => ExitCode::ArgsError,
                ErrorCategory::Forecast => ExitCode::InternalError,
                ErrorCategory::Io => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
