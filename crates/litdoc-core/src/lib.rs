//! # litdoc core
//!
//! Pure primitives for locked documents: archives, bundle encryption,
//! and access-control condition canonicalization.
//!
//! This crate contains no networking and no document rendering. It is
//! pure computation over byte containers and keys.
//!
//! ## Pipeline
//!
//! ```text
//! Archive::single_text / Archive::file_set
//!        │ to_bytes (tar.gz)
//!        ▼
//! encrypt_bundle ──► SealedBundle { key, bundle }
//!        ▲
//! decrypt_bundle ◄── (EncryptedBundle, SymmetricKey)
//! ```
//!
//! ## Key Types
//!
//! - [`Archive`] - Ordered, uniquely named entries
//! - [`SymmetricKey`] - Single-use 256-bit key, never logged
//! - [`EncryptedBundle`] - Opaque ciphertext envelope
//! - [`AccessControlCondition`] - Externally evaluated predicate

pub mod archive;
pub mod bundle;
pub mod canonical;
pub mod crypto;
pub mod data_url;
pub mod embedded;
pub mod error;

pub use archive::{Archive, ArchiveEntry, ASSET_FOLDER, PRIMARY_ENTRY};
pub use bundle::{
    decrypt_bundle, encrypt_bundle, encrypt_files, encrypt_text, BundleFormat, EncryptedBundle,
    SealedBundle,
};
pub use canonical::{
    canonicalize_all, AccessControlCondition, CanonicalFormatter, ConditionFormatter,
};
pub use crypto::{Blake3Hash, BundleNonce, SymmetricKey, KEY_LEN};
pub use data_url::{bundle_data_url, bundle_from_data_url, decode_data_url, encode_data_url};
pub use embedded::EmbeddedState;
pub use error::{CoreError, Result};
