//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::resolution::ResolveError;

/// Process exit codes.
///
/// - 0: Success (including "no duplicates found")
/// - 1: Interrupted by user (Ctrl+C)
/// - 2: Fatal error (invalid roots, I/O failure, internal consistency check)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Run completed.
    Success = 0,
    /// Run was interrupted between files or groups.
    Interrupted = 1,
    /// Run aborted on an error.
    Fatal = 2,
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
            Self::Success => "DP000",
            Self::Interrupted => "DP001",
            Self::Fatal => "DP002",
        }
    }

    /// Map a top-level error to its exit code.
    ///
    /// Interruption is recognised anywhere in the error chain; everything else
    /// is fatal.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<FinderError>()
                .is_some_and(|e| matches!(e, FinderError::Interrupted))
                || cause
                    .downcast_ref::<ResolveError>()
                    .is_some_and(|e| matches!(e, ResolveError::Interrupted))
        });
        if interrupted {
            Self::Interrupted
        } else {
            Self::Fatal
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DP002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the run was interrupted
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
