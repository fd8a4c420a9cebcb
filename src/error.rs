//! Error classes that decide the process exit code.

use thiserror::Error;

/// Failures that abort a run. Anything else surfacing from the library is a general error.
#[derive(Debug, Error)]
pub enum DupeError {
    /// Bad invocation, detected before any work starts.
    #[error("usage: {0}")]
    Usage(String),
    /// A crawl or hash thread could not be started.
    #[error("failed to start {task}: {source}")]
    TaskSpawn {
        task: String,
        #[source]
        source: std::io::Error,
    },
    /// A crawl or hash thread panicked; its share of the work cannot be trusted.
    #[error("{task} did not finish (thread panicked)")]
    TaskJoin { task: String },
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Run completed.
    Success = 0,
    /// Unexpected failure (e.g. root directory missing).
    GeneralError = 1,
    /// Bad arguments.
    Usage = 2,
    /// A worker or crawl task failed to start or join.
    TaskFailure = 3,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Pick the exit code for an error returned by the library.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<DupeError>() {
            Some(DupeError::Usage(_)) => Self::Usage,
            Some(DupeError::TaskSpawn { .. } | DupeError::TaskJoin { .. }) => Self::TaskFailure,
            None => Self::GeneralError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
