//! # litdoc
//!
//! Locked documents: arbitrary content encrypted into a bundle, packaged
//! as one self-contained HTML file, and unlockable only by holders who
//! satisfy an access condition evaluated by an external network.
//!
//! ## Overview
//!
//! - **Bundles**: content is archived and sealed with a fresh key
//! - **Packaging**: the bundle, its conditions, and the gated key are
//!   embedded in a document with an unlock control
//! - **Unlocking**: auth proof, key release, decrypt, content swap
//! - **Tokens**: servers verify network-signed tokens offline
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use litdoc::{KeyGate, LockedContent, PublishRequest, Publisher};
//! use litdoc::packager::{Packager, PackagerConfig};
//!
//! async fn example(gate: Arc<dyn KeyGate>) {
//!     let publisher = Publisher::new(Packager::from_config(PackagerConfig::default()), gate);
//!
//!     let published = publisher
//!         .publish(PublishRequest {
//!             title: "Members".into(),
//!             html_body: r#"<div id="mediaGridHolder"></div><button id="unlockButton">Unlock</button>"#.into(),
//!             css: String::new(),
//!             content: LockedContent::Text("<p>members only</p>".into()),
//!             access_control_conditions: vec![],
//!             chain: "ethereum".into(),
//!             npm_packages: vec![],
//!             use_proxy: false,
//!         })
//!         .await
//!         .unwrap();
//!
//!     std::fs::write("members.html", published.document.html).unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `litdoc::core` - archives, bundle cipher, conditions
//! - `litdoc::packager` - document packaging and the package cache
//! - `litdoc::unlock` - the unlock runtime
//! - `litdoc::jwt` - token verification

pub mod error;
pub mod publisher;

pub use litdoc_core as core;
pub use litdoc_jwt as jwt;
pub use litdoc_packager as packager;
pub use litdoc_unlock as unlock;

pub use error::{LitError, Result};
pub use publisher::{KeyGate, LockedContent, PublishRequest, Published, Publisher};

pub use litdoc_core::{
    decrypt_bundle, encrypt_bundle, encrypt_files, encrypt_text, AccessControlCondition, Archive,
    EncryptedBundle, SealedBundle, SymmetricKey,
};
pub use litdoc_jwt::{JwtVerifier, NetworkPublicKey, VerifiedToken};
pub use litdoc_packager::{LitDocument, PackageRequest, Packager, PackagerConfig};
pub use litdoc_unlock::{LitRuntime, ToggleOutcome};
