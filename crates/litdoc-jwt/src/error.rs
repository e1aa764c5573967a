//! Error types for token verification.

use thiserror::Error;

/// Errors that stop a token from being read at all.
///
/// A readable token with a bad signature is not an error; it verifies
/// as `false`.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Wrong segment count, or a header/payload that is not base64url JSON.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The network public key could not be decoded.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The signature bytes do not encode a curve point.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Hashing the message onto the curve failed.
    #[error("hash to curve failed: {0}")]
    HashToCurve(String),
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, JwtError>;
