//! Unified error type.

use litdoc_core::CoreError;
use litdoc_jwt::JwtError;
use litdoc_packager::PackagerError;
use litdoc_unlock::UnlockError;
use thiserror::Error;

/// Errors from any litdoc component.
#[derive(Debug, Error)]
pub enum LitError {
    /// Archive, cipher, or condition error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Packaging error.
    #[error("packager error: {0}")]
    Packager(#[from] PackagerError),

    /// Unlock runtime error.
    #[error("unlock error: {0}")]
    Unlock(#[from] UnlockError),

    /// Token error.
    #[error("token error: {0}")]
    Jwt(#[from] JwtError),

    /// The network could not store the bundle key.
    #[error("key gate error: {0}")]
    KeyGate(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, LitError>;
