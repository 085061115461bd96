//! Error types for hybridqa.
//!
//! All fallible operations return [`HybridQaError`] through the crate-wide
//! [`Result`] alias. The variants that matter for retrieval are the four query
//! failure kinds: [`HybridQaError::InvalidConfig`],
//! [`HybridQaError::SourceUnavailable`], [`HybridQaError::DimensionMismatch`]
//! and [`HybridQaError::SourceTimeout`].
//!
//! # Examples
//!
//! ```
//! use hybridqa::error::{HybridQaError, Result};
//!
//! fn check_top_k(top_k: usize) -> Result<()> {
//!     if top_k == 0 {
//!         return Err(HybridQaError::invalid_config("top_k must be greater than 0"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_top_k(0).is_err());
//! ```

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::hybrid_search::types::SourceKind;

/// The main error type for hybridqa operations.
#[derive(Error, Debug)]
pub enum HybridQaError {
    /// The fusion configuration was rejected before any source was queried.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A retrieval backend could not complete its request.
    #[error("{kind} source unavailable: {message}")]
    SourceUnavailable { kind: SourceKind, message: String },

    /// The query embedding does not match the vector index dimension.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A sub-search exceeded its time budget.
    #[error("{kind} source timed out after {}ms", timeout.as_millis())]
    SourceTimeout { kind: SourceKind, timeout: Duration },

    /// Corpus-related errors (missing columns, unsupported formats).
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// I/O errors (file operations, terminal, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with HybridQaError.
pub type Result<T> = std::result::Result<T, HybridQaError>;

impl HybridQaError {
    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        HybridQaError::InvalidConfig(msg.into())
    }

    /// Create a new source unavailable error.
    pub fn source_unavailable<S: Into<String>>(kind: SourceKind, msg: S) -> Self {
        HybridQaError::SourceUnavailable {
            kind,
            message: msg.into(),
        }
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        HybridQaError::DimensionMismatch { expected, actual }
    }

    /// Create a new timeout error.
    pub fn timeout(kind: SourceKind, timeout: Duration) -> Self {
        HybridQaError::SourceTimeout { kind, timeout }
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        HybridQaError::Corpus(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        HybridQaError::Other(msg.into())
    }

    /// Whether this error means a source failed to answer (unavailable or timed out).
    ///
    /// These are the failures a degrading fusion engine may absorb.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            HybridQaError::SourceUnavailable { .. } | HybridQaError::SourceTimeout { .. }
        )
    }

    /// The source this error is attributed to, if any.
    pub fn source_kind(&self) -> Option<SourceKind> {
        match self {
            HybridQaError::SourceUnavailable { kind, .. }
            | HybridQaError::SourceTimeout { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = HybridQaError::invalid_config("top_k must be greater than 0");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: top_k must be greater than 0"
        );

        let error = HybridQaError::source_unavailable(SourceKind::Lexical, "connection refused");
        assert_eq!(
            error.to_string(),
            "lexical source unavailable: connection refused"
        );

        let error = HybridQaError::dimension_mismatch(384, 128);
        assert_eq!(
            error.to_string(),
            "Vector dimension mismatch: expected 384, got 128"
        );

        let error = HybridQaError::timeout(SourceKind::Semantic, Duration::from_millis(250));
        assert_eq!(error.to_string(), "semantic source timed out after 250ms");
    }

    #[test]
    fn test_source_failure_classification() {
        assert!(HybridQaError::source_unavailable(SourceKind::Lexical, "down").is_source_failure());
        assert!(
            HybridQaError::timeout(SourceKind::Semantic, Duration::from_secs(1))
                .is_source_failure()
        );
        assert!(!HybridQaError::dimension_mismatch(3, 4).is_source_failure());
        assert!(!HybridQaError::invalid_config("bad").is_source_failure());

        assert_eq!(
            HybridQaError::timeout(SourceKind::Semantic, Duration::from_secs(1)).source_kind(),
            Some(SourceKind::Semantic)
        );
        assert_eq!(HybridQaError::other("x").source_kind(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = HybridQaError::from(io_error);

        match error {
            HybridQaError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
