//! Error types for the unlock runtime.

use litdoc_core::CoreError;
use thiserror::Error;

/// Errors raised while unlocking.
///
/// Expected refusals (wrong chain, unauthorized, network not ready) are
/// not errors; they come back as [`crate::ToggleOutcome::Aborted`].
#[derive(Debug, Error)]
pub enum UnlockError {
    /// Decoding, decryption, or archive parsing failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A collaborator (network, signer, frame messenger) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

/// Result type for unlock operations.
pub type Result<T> = std::result::Result<T, UnlockError>;
