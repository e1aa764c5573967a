//! # litdoc packager
//!
//! Turns an encrypted bundle into a self-contained, distributable HTML
//! document ("a LIT").
//!
//! ## Overview
//!
//! A packaged document embeds:
//!
//! - the encrypted bundle as an inline data URL
//! - the canonicalized access-control conditions
//! - the chain identifier
//! - the condition-gated ciphertext of the bundle key (hex)
//! - optional runtime packages, fetched once and cached
//!
//! plus a small script that keeps the `unlockButton` disabled until the
//! runtime reports `lit-ready`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use litdoc_core::{bundle_data_url, encrypt_text};
//! use litdoc_packager::{PackageRequest, Packager, PackagerConfig};
//!
//! async fn example() {
//!     let sealed = encrypt_text("<p>members only</p>").unwrap();
//!
//!     // The key itself is encrypted under the conditions upstream.
//!     // let gated_key = network.save_encryption_key(&sealed.key, &conditions).await?;
//!     let gated_key = vec![0u8; 32];
//!
//!     let packager = Packager::from_config(PackagerConfig::default());
//!     let document = packager
//!         .package(PackageRequest::new(
//!             "Members",
//!             r#"<div id="mediaGridHolder"></div><button id="unlockButton">Unlock</button>"#,
//!             bundle_data_url(&sealed.bundle),
//!             vec![],
//!             gated_key,
//!             "ethereum",
//!         ))
//!         .await
//!         .unwrap();
//!
//!     std::fs::write("members.html", document.html).unwrap();
//! }
//! ```

pub mod cache;
pub mod document;
pub mod error;
pub mod packager;
pub mod registry;

pub use cache::{
    CacheConfig, EntryStats, EvictionPolicy, FirstInFirstOut, LeastRecentlyUsed, PackageCache,
};
pub use document::{
    LitDocument, CONTENT_REGION_ID, DEFAULT_RUNTIME_SCRIPT_URL, HEADER_ID, READY_EVENT,
    UNLOCK_BUTTON_ID,
};
pub use error::{PackagerError, Result};
pub use packager::{PackageRequest, Packager, PackagerConfig};
pub use registry::{FetchedPackage, HttpRegistry, PackageRegistry, DEFAULT_REGISTRY_ROOT};
