use std::io;

use thiserror::Error;

/// Failures while sampling disk, memory or process figures.
///
/// None of these are fatal: the monitor turns every variant into a log line.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// The helper program is not installed or could not be launched.
    #[error("'{program}' could not be launched: {source}")]
    UtilityUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The tool's output no longer matches the expected line/field layout.
    #[error("unexpected output from '{program}': {reason}")]
    Parse { program: String, reason: String },

    #[error("{0}")]
    Disk(String),

    #[error("{0}")]
    Process(String),

    #[error("{0}")]
    Unsupported(String),
}

/// Result type alias for sampler operations
pub type SamplerResult<T> = Result<T, SamplerError>;

impl SamplerError {
    pub(crate) fn parse(program: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            program: program.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this is the "helper program missing" case, which is reported
    /// at trace level instead of as a warning.
    pub fn is_utility_unavailable(&self) -> bool {
        matches!(self, Self::UtilityUnavailable { .. })
    }
}
