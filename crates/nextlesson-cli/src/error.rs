//! CLI error type.

use thiserror::Error;

use nextlesson_core::TracingError;
use nextlesson_providers::SourceError;

/// Anything that aborts a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A timetable source operation failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Tracing could not be initialized.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A specialized Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
