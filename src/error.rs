//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the samplecmp application.
///
/// - 0: Success (everything compared matched)
/// - 1: Mismatch (at least one file differs or is missing)
/// - 2: Invalid input (empty or nonexistent paths, bad pattern)
/// - 3: Lookup failed (dataset name could not be resolved)
/// - 4: General error (unexpected failure, I/O error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: all compared files match.
    Success = 0,
    /// Mismatch: at least one file differs or is missing.
    Mismatch = 1,
    /// Invalid input: a path or pattern argument could not be used.
    InvalidInput = 2,
    /// Lookup failed: the dataset resolver could not supply directories.
    LookupFailed = 3,
    /// General error: an unexpected failure occurred.
    GeneralError = 4,
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
            Self::Success => "SC000",
            Self::Mismatch => "SC001",
            Self::InvalidInput => "SC002",
            Self::LookupFailed => "SC003",
            Self::GeneralError => "SC004",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SC004")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
