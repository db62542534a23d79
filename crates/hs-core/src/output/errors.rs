//! Structured error output.
//!
//! Failures are reported on stderr in the same format as the command would
//! have used on success, so a script reading JSON always gets JSON.

use super::{Report, ReportHeader};
use crate::exit_codes::ExitCode;
use hs_common::ErrorCategory;
use serde::Serialize;

/// Error detail.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable error code from [`hs_common::Error::code`].
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    pub remediation: String,
    pub exit_code: i32,
    /// Exit code name, e.g. `ERR_NO_ESTIMATE`.
    pub exit_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub error: ErrorBody,
    #[serde(skip)]
    exit: ExitCode,
}

impl ErrorReport {
    pub fn new(header: ReportHeader, error: &hs_common::Error) -> Self {
        let exit = ExitCode::for_error(error);
        Self {
            header,
            status: "error",
            command: None,
            error: ErrorBody {
                code: error.code(),
                category: error.category(),
                message: error.to_string(),
                recoverable: error.is_recoverable(),
                remediation: error.remediation().to_string(),
                exit_code: exit.as_i32(),
                exit_name: exit.code_name().to_string(),
            },
            exit,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit
    }
}

impl Report for ErrorReport {
    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn markdown(&self) -> String {
        let mut out = String::from("# Error\n\n");
        if let Some(command) = &self.command {
            out.push_str(&format!("Command: `{command}`\n\n"));
        }
        out.push_str(&format!(
            "{} (code {}, {})\n\n{}\n",
            self.error.message, self.error.code, self.error.category, self.error.remediation
        ));
        out
    }

    fn summary(&self) -> String {
        format!(
            "[{}] error {}: {}",
            self.header.run_id, self.error.code, self.error.message
        )
    }
}
