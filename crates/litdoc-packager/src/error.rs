//! Error types for the packager.

use litdoc_core::CoreError;
use thiserror::Error;

/// Errors that abort a packaging call. No partial document is returned.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The registry answered with a non-success status.
    #[error("failed to fetch package {package}: {status}")]
    PackageFetchFailure {
        /// Package name that was requested.
        package: String,
        /// Status text returned by the registry.
        status: String,
    },

    /// The registry could not be reached.
    #[error("registry transport error: {0}")]
    Transport(String),

    /// Core error (condition canonicalization, archive, cipher).
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for PackagerError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Result type for packager operations.
pub type Result<T> = std::result::Result<T, PackagerError>;
