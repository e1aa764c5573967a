//! # litdoc jwt
//!
//! Server-side verification of tokens signed by the key-release network.
//!
//! A holder who satisfies a resource's conditions obtains a token from
//! the network; a server checks it with [`JwtVerifier::verify`]. A `true`
//! result proves the network signed this exact header and payload.
//! Expiry and other claims are not checked.
//!
//! No network key is built in. Each deployment of the key-release network
//! publishes its own BLS12-381 public key, and callers pass it in, usually
//! through [`NetworkPublicKey::from_hex`]. Pin one key per verifier.
//!
//! ```rust,no_run
//! use litdoc_jwt::{JwtVerifier, NetworkPublicKey};
//!
//! fn example(published_key_hex: &str, jwt: &str) {
//!     let key = NetworkPublicKey::from_hex(published_key_hex).unwrap();
//!     let token = JwtVerifier::new(key).verify(jwt).unwrap();
//!     if token.verified {
//!         println!("authorized for {}", token.payload["baseUrl"]);
//!     }
//! }
//! ```

pub mod error;
pub mod oracle;
pub mod verifier;

pub use error::{JwtError, Result};
pub use oracle::{
    hash_to_g2, Bls12381Oracle, NetworkPublicKey, SignatureOracle, PUBLIC_KEY_LEN, SIGNATURE_DST,
    SIGNATURE_LEN,
};
pub use verifier::{decode_segment, encode_segment, JwtVerifier, VerifiedToken};
