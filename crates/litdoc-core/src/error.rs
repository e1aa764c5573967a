//! Error types for the litdoc core.

use thiserror::Error;

/// Errors that can occur while building, sealing, or opening bundles.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two inputs to a file-set archive share a name.
    #[error("duplicate archive entry name: {0}")]
    DuplicateEntryName(String),

    /// An entry name is empty, absolute, or escapes the archive root.
    #[error("invalid archive entry name: {0:?}")]
    InvalidEntryName(String),

    /// The archive could not be serialized.
    #[error("archive write error: {0}")]
    ArchiveWriteError(String),

    /// The archive container is truncated or corrupted.
    #[error("archive parse error: {0}")]
    ArchiveParseError(String),

    /// The bundle could not be decrypted (wrong key or tampered ciphertext).
    #[error("decryption failure")]
    DecryptionFailure,

    /// The decrypted archive has no `string.txt` entry.
    #[error("archive has no primary entry {0:?}")]
    MissingPrimaryEntry(String),

    /// An entry was requested as text but is not valid UTF-8.
    #[error("entry {0:?} is not valid UTF-8")]
    NotText(String),

    /// Raw key material has the wrong length.
    #[error("invalid key: expected 32 bytes, got {0}")]
    InvalidKey(usize),

    /// An access-control condition does not have a recognised shape.
    #[error("invalid access control condition: {0}")]
    InvalidCondition(String),

    /// A bundle reference is not a well-formed base64 data URL.
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),

    /// Encryption failed.
    #[error("encryption error: {0}")]
    EncryptionError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
