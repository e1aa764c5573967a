//! Symmetric bundle cipher.
//!
//! Seals a serialized [`Archive`] under a freshly generated, single-use
//! key and opens it again. The bundle is an envelope carrying the cipher
//! format, the nonce, and the ciphertext (with its authentication tag),
//! serialized as CBOR so it can travel as one opaque blob.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::Archive;
use crate::crypto::{Blake3Hash, BundleNonce, SymmetricKey};
use crate::error::{CoreError, Result};

/// Cipher identifier carried inside every bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BundleFormat {
    /// ChaCha20-Poly1305 with a 256-bit key.
    ChaCha20Poly1305 = 1,
}

/// An encrypted, serialized archive.
///
/// Only the exact key it was sealed under opens it. Any corruption of the
/// envelope or ciphertext is reported as `DecryptionFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBundle {
    /// Cipher used.
    pub format: BundleFormat,

    /// Nonce used for encryption (unique per bundle).
    pub nonce: BundleNonce,

    /// The encrypted archive bytes (includes authentication tag).
    pub ciphertext: Vec<u8>,
}

impl EncryptedBundle {
    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }

    /// Deserialize from CBOR bytes.
    ///
    /// A mangled envelope cannot be told apart from a tampered ciphertext,
    /// so both surface as `DecryptionFailure`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|_| CoreError::DecryptionFailure)
    }

    /// Non-secret fingerprint of the ciphertext, safe to log.
    pub fn fingerprint(&self) -> Blake3Hash {
        Blake3Hash::hash(&self.ciphertext)
    }
}

/// The output of sealing an archive: the bundle and the key that opens it.
#[derive(Debug, Clone)]
pub struct SealedBundle {
    /// Raw single-use key. The caller owns its distribution.
    pub key: SymmetricKey,
    /// The encrypted archive.
    pub bundle: EncryptedBundle,
}

/// Serialize `archive` and encrypt it under a brand new key.
pub fn encrypt_bundle(archive: &Archive) -> Result<SealedBundle> {
    let plaintext = archive.to_bytes()?;
    let key = SymmetricKey::generate();
    let nonce = BundleNonce::generate();
    let ciphertext = key.encrypt(&plaintext, &nonce)?;

    let bundle = EncryptedBundle {
        format: BundleFormat::ChaCha20Poly1305,
        nonce,
        ciphertext,
    };
    debug!(
        entries = archive.len(),
        bundle = %bundle.fingerprint(),
        "sealed archive"
    );

    Ok(SealedBundle { key, bundle })
}

/// Decrypt a bundle and parse the archive inside it.
pub fn decrypt_bundle(bundle: &EncryptedBundle, key: &SymmetricKey) -> Result<Archive> {
    let plaintext = match bundle.format {
        BundleFormat::ChaCha20Poly1305 => key.decrypt(&bundle.ciphertext, &bundle.nonce)?,
    };
    Archive::from_bytes(&plaintext)
}

/// Archive a string as `string.txt` and seal it.
pub fn encrypt_text(text: &str) -> Result<SealedBundle> {
    encrypt_bundle(&Archive::single_text(text))
}

/// Archive a set of named files under `encryptedAssets/` and seal them.
pub fn encrypt_files<N, D>(files: impl IntoIterator<Item = (N, D)>) -> Result<SealedBundle>
where
    N: Into<String>,
    D: Into<bytes::Bytes>,
{
    encrypt_bundle(&Archive::file_set(files)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_roundtrip() {
        let sealed = encrypt_text("hello").unwrap();
        let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.primary_text().unwrap(), "hello");
    }

    #[test]
    fn test_file_set_roundtrip() {
        let sealed =
            encrypt_files(vec![("a.txt", b"alpha".to_vec()), ("b.txt", b"beta".to_vec())])
                .unwrap();
        let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();

        assert_eq!(archive.len(), 2);
        assert_eq!(
            archive.entry("encryptedAssets/a.txt").unwrap().as_bytes(),
            b"alpha"
        );
        assert_eq!(
            archive.entry("encryptedAssets/b.txt").unwrap().as_bytes(),
            b"beta"
        );
    }

    #[test]
    fn test_keys_are_fresh() {
        let archive = Archive::single_text("same input");
        let a = encrypt_bundle(&archive).unwrap();
        let b = encrypt_bundle(&archive).unwrap();

        assert_ne!(a.key.as_bytes(), b.key.as_bytes());
        assert_ne!(a.bundle.nonce, b.bundle.nonce);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = encrypt_text("secret").unwrap();
        let other = SymmetricKey::generate();

        assert!(matches!(
            decrypt_bundle(&sealed.bundle, &other),
            Err(CoreError::DecryptionFailure)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut sealed = encrypt_text("secret").unwrap();
        sealed.bundle.ciphertext[0] ^= 0x01;

        assert!(matches!(
            decrypt_bundle(&sealed.bundle, &sealed.key),
            Err(CoreError::DecryptionFailure)
        ));
    }

    #[test]
    fn test_envelope_serialization() {
        let sealed = encrypt_text("test").unwrap();

        let bytes = sealed.bundle.to_bytes();
        let recovered = EncryptedBundle::from_bytes(&bytes).unwrap();

        assert_eq!(sealed.bundle, recovered);
    }

    #[test]
    fn test_mangled_envelope_is_decryption_failure() {
        assert!(matches!(
            EncryptedBundle::from_bytes(&[0xff, 0x00, 0x13]),
            Err(CoreError::DecryptionFailure)
        ));
    }
}
