//! Structured error handling and exit codes.

use serde::Serialize;

use crate::actions::DeletionSummary;

/// Exit codes for rmlint-manager.
///
/// - 0: Success (query answered, or every duplicate handled)
/// - 1: General error (unexpected failure, unreadable report)
/// - 2: Nothing to do (the report holds no actionable duplicates)
/// - 3: Partial success (some duplicates were skipped or failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Nothing to do: no duplicate groups in the report.
    NothingToDo = 2,
    /// Partial success: some items were skipped or failed.
    PartialSuccess = 3,
    /// Interrupted: the run was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RM000",
            Self::GeneralError => "RM001",
            Self::NothingToDo => "RM002",
            Self::PartialSuccess => "RM003",
            Self::Interrupted => "RM130",
        }
    }

    /// Exit code for a finished deletion run.
    #[must_use]
    pub fn from_summary(summary: &DeletionSummary) -> Self {
        if summary.interrupted {
            Self::Interrupted
        } else if summary.total == 0 {
            Self::NothingToDo
        } else if summary.all_succeeded() {
            Self::Success
        } else {
            Self::PartialSuccess
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "RM001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
