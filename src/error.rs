//! Exit codes and the top-level pipeline error.

use crate::actions::CopyError;
use crate::duplicates::FinderError;

/// Exit codes for the dupfold application.
///
/// - 0: Success (every phase completed)
/// - 1: General error (any fatal walk, hash, or copy failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: all phases completed.
    Success = 0,
    /// General error: the run was aborted.
    GeneralError = 1,
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
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
        }
    }
}

/// Errors that abort a pipeline run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Walking or hashing failed.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// Copying into the destination failed.
    #[error(transparent)]
    Copy(#[from] CopyError),
}
