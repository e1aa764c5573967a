//! # litdoc testkit
//!
//! Testing utilities for litdoc.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: scripted network, signer, and registry collaborators,
//!   and a ready-to-toggle [`RuntimeFixture`]
//! - **Generators**: proptest strategies for content, file sets, and
//!   access-control conditions
//! - **Tokens**: a deterministic BLS12-381 signer producing tokens the
//!   verifier accepts
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use litdoc_testkit::fixtures::RuntimeFixture;
//!
//! async fn example() {
//!     let fixture = RuntimeFixture::builder("<p>secret</p>").wrong_chain().build();
//!     let outcome = fixture.runtime.toggle_lock().await.unwrap();
//!     println!("{outcome:?}");
//! }
//! ```
//!
//! ## Signed Tokens
//!
//! ```rust
//! use litdoc_jwt::JwtVerifier;
//! use litdoc_testkit::tokens::{token_header, token_payload, TokenSigner};
//!
//! let signer = TokenSigner::test_network();
//! let jwt = signer.sign_token(&token_header(), &token_payload());
//! assert!(JwtVerifier::new(signer.public_key()).verify(&jwt).unwrap().verified);
//! ```

pub mod fixtures;
pub mod generators;
pub mod tokens;

pub use fixtures::{
    sample_auth_sig, sample_conditions, RuntimeFixture, RuntimeFixtureBuilder, ScriptedNetwork,
    ScriptedSigner, StaticRegistry, PUBLIC_CONTENT,
};
pub use tokens::{token_header, token_payload, TokenSigner, TEST_NETWORK_SEED};
