//! Error types for SiteTriage.
//!
//! Library crates use [`TriageError`] via `thiserror`.
//! The `sitetriage` binary wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Rejected scan input. The display strings are part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Maximum depth is 7 layers")]
    DepthTooLarge,

    #[error("Invalid request body")]
    MalformedBody,
}

/// Top-level error type for all SiteTriage operations.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error outside the per-page fetch path.
    #[error("network error: {0}")]
    Network(String),

    /// Caller supplied an unusable scan request.
    #[error(transparent)]
    Validation(#[from] InputError),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The scan did not finish inside its wall-clock budget.
    #[error("scan exceeded its time budget of {secs}s")]
    Timeout { secs: u64 },

    /// Anything that should not happen (task panics, broken invariants).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an internal error from any displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error is the caller's fault (maps to HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TriageError::config("missing [crawl] section");
        assert_eq!(err.to_string(), "config error: missing [crawl] section");

        let err = TriageError::Timeout { secs: 300 };
        assert!(err.to_string().contains("300s"));
    }

    #[test]
    fn validation_errors_keep_contract_messages() {
        let err: TriageError = InputError::MissingUrl.into();
        assert_eq!(err.to_string(), "URL is required");
        assert!(err.is_client_error());

        assert_eq!(InputError::InvalidUrl.to_string(), "Invalid URL format");
        assert_eq!(InputError::DepthTooLarge.to_string(), "Maximum depth is 7 layers");
    }

    #[test]
    fn internal_errors_are_not_client_errors() {
        assert!(!TriageError::internal("boom").is_client_error());
        assert!(!TriageError::Timeout { secs: 1 }.is_client_error());
    }
}
