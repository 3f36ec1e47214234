//! Caller-selectable solver behavior.

use clap::ValueEnum;
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::TaperError;

/// What happens when a solve fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Return the error (and its status code) to the caller.
    #[default]
    Status,
    /// Print a diagnostic and terminate the process with the status code.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub error_mode: ErrorMode,
    /// Reorder output columns from best to worst concentrated when the
    /// eigensolver's order disagrees with the recomputed eigenvalues.
    pub order_by_concentration: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Status,
            order_by_concentration: true,
        }
    }
}

impl ErrorMode {
    /// Apply this mode to a result: pass it through, or exit on failure.
    pub fn resolve<T>(self, result: Result<T, TaperError>) -> Result<T, TaperError> {
        match self {
            ErrorMode::Status => result,
            ErrorMode::Abort => Ok(exit_on_error(result)),
        }
    }
}

/// Unwrap `result`, or log the diagnostic and exit with its status code.
pub fn exit_on_error<T>(result: Result<T, TaperError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!("aborting: {err}");
            eprintln!("{err}");
            std::process::exit(i32::from(err.exit_code()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mode_passes_errors_through() {
        let result: Result<(), TaperError> = Err(TaperError::range("bad order"));
        let err = ErrorMode::Status.resolve(result).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn abort_mode_passes_success_through() {
        assert_eq!(ErrorMode::Abort.resolve(Ok::<_, TaperError>(7)).unwrap(), 7);
    }

    #[test]
    fn defaults_return_status_and_sort() {
        let opts = SolverOptions::default();
        assert_eq!(opts.error_mode, ErrorMode::Status);
        assert!(opts.order_by_concentration);
    }
}
