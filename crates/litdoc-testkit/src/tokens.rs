//! Deterministically signed tokens.
//!
//! Stands in for the threshold signer: a single BLS12-381 key derived
//! from a seed signs tokens the verifier accepts.

use ark_bls12_381::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use litdoc_jwt::{encode_segment, hash_to_g2, NetworkPublicKey};
use serde_json::{json, Value};

/// Seed of the signer used throughout the test suite.
pub const TEST_NETWORK_SEED: &[u8] = b"litdoc test network key";

/// A signer holding one BLS12-381 secret.
pub struct TokenSigner {
    secret: Fr,
    public_key: NetworkPublicKey,
}

impl TokenSigner {
    /// Derive the secret from `seed`.
    pub fn from_seed(seed: &[u8]) -> Self {
        let secret = Fr::from_le_bytes_mod_order(seed);
        let public = (G1Affine::generator() * secret).into_affine();
        Self {
            secret,
            public_key: NetworkPublicKey::from_point(public),
        }
    }

    /// The signer behind [`TEST_NETWORK_SEED`].
    pub fn test_network() -> Self {
        Self::from_seed(TEST_NETWORK_SEED)
    }

    pub fn public_key(&self) -> NetworkPublicKey {
        self.public_key
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.to_bytes())
    }

    /// Compressed signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let point = (hash_to_g2(message).expect("hash to G2") * self.secret).into_affine();
        let mut out = Vec::new();
        point
            .serialize_compressed(&mut out)
            .expect("serializing into a Vec never fails");
        out
    }

    /// A complete token for `header` and `payload`.
    pub fn sign_token(&self, header: &Value, payload: &Value) -> String {
        let signing_input = format!(
            "{}.{}",
            encode_segment(header.to_string().as_bytes()),
            encode_segment(payload.to_string().as_bytes())
        );
        let signature = self.sign(signing_input.as_bytes());
        format!("{signing_input}.{}", encode_segment(&signature))
    }
}

/// Header the network puts on its tokens.
pub fn token_header() -> Value {
    json!({ "alg": "BLS12-381", "typ": "JWT" })
}

/// Payload authorizing a holder for one resource.
pub fn token_payload() -> Value {
    json!({
        "iss": "LIT",
        "sub": "0x9b9f6e4f1c8f1c3f2c4f7e1b1d1a0c9b8a7f6e5d",
        "chain": "ethereum",
        "iat": 1_760_000_000u64,
        "exp": 1_760_043_200u64,
        "baseUrl": "https://example.com",
        "path": "/members",
        "orgId": "",
        "role": "",
        "extraData": ""
    })
}
