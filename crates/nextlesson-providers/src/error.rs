//! Error types for timetable source operations.
//!
//! Only `NotFound` ever reaches the presentation layer: individual source
//! or format-variant failures are absorbed by the fallback chains in
//! [`crate::fetch`] and [`crate::resolve`], and day fetches degrade to an
//! empty lesson list rather than erroring.

use thiserror::Error;

/// An error from one of the timetable sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Resolution exhausted every strategy without a match.
    #[error("no class or teacher named \"{0}\"")]
    NotFound(String),

    /// The public endpoint answered with a non-success HTTP status.
    #[error("public endpoint returned HTTP {0}")]
    Status(u16),

    /// Transport-level failure (connect, DNS, timeout, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The RPC endpoint reported a fault.
    #[error("rpc fault {code}: {message}")]
    Rpc {
        /// Upstream fault code.
        code: i64,
        /// Upstream fault message.
        message: String,
    },

    /// A response parsed but did not have the expected shape.
    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// True for the only error the presentation layer is expected to show.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_the_name() {
        let err = SourceError::NotFound("M5".to_string());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("M5"));
    }

    #[test]
    fn status_display() {
        let err = SourceError::Status(503);
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("503"));
    }
}
