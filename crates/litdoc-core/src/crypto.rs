//! Symmetric key material for sealing bundles.
//!
//! Wraps ChaCha20-Poly1305 keys and nonces with strong types, plus a
//! Blake3 fingerprint used to refer to ciphertexts in logs.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Length of a raw symmetric key in bytes.
pub const KEY_LEN: usize = 32;

/// A single-use 256-bit symmetric key.
///
/// Generated fresh for every bundle. The caller owns distribution of the
/// raw bytes (typically by encrypting them under access-control
/// conditions); nothing in this crate persists or logs them.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Import raw key bytes of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidKey(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Export the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encrypt data with this key.
    pub fn encrypt(&self, plaintext: &[u8], nonce: &BundleNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| CoreError::EncryptionError(e.to_string()))?;

        cipher
            .encrypt(Nonce::from_slice(&nonce.0), plaintext)
            .map_err(|e| CoreError::EncryptionError(e.to_string()))
    }

    /// Decrypt data with this key.
    ///
    /// Any authentication failure maps to [`CoreError::DecryptionFailure`].
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &BundleNonce) -> Result<Vec<u8>> {
        let cipher =
            ChaCha20Poly1305::new_from_slice(&self.0).map_err(|_| CoreError::DecryptionFailure)?;

        cipher
            .decrypt(Nonce::from_slice(&nonce.0), ciphertext)
            .map_err(|_| CoreError::DecryptionFailure)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// A 96-bit nonce for ChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleNonce(pub [u8; 12]);

impl BundleNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 12];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

/// A 32-byte Blake3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let key = SymmetricKey::generate();
        let nonce = BundleNonce::generate();
        let plaintext = b"hello, world!";

        let ciphertext = key.encrypt(plaintext, &nonce).unwrap();
        assert_ne!(ciphertext, plaintext);

        let decrypted = key.decrypt(&ciphertext, &nonce).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let key1 = SymmetricKey::generate();
        let key2 = SymmetricKey::generate();
        let nonce = BundleNonce::generate();

        let ciphertext = key1.encrypt(b"secret", &nonce).unwrap();

        assert!(matches!(
            key2.decrypt(&ciphertext, &nonce),
            Err(CoreError::DecryptionFailure)
        ));
    }

    #[test]
    fn test_from_slice_rejects_bad_length() {
        assert!(matches!(
            SymmetricKey::from_slice(&[0u8; 16]),
            Err(CoreError::InvalidKey(16))
        ));
        assert!(SymmetricKey::from_slice(&[7u8; 32]).is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = SymmetricKey::from_bytes([0xab; 32]);
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("ab"));
    }
}
