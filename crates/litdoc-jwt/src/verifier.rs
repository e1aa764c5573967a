//! Token verification.
//!
//! A token is `header.payload.signature`, each segment base64url. The
//! signature covers the first two segments exactly as transmitted.
//! Claims such as expiry are returned as-is and not validated.

use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{JwtError, Result};
use crate::oracle::{Bls12381Oracle, NetworkPublicKey, SignatureOracle};

/// base64url, unpadded on output, padding tolerated on input.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as a token segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    SEGMENT_ENGINE.encode(bytes)
}

/// Decode a token segment.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>> {
    SEGMENT_ENGINE
        .decode(segment)
        .map_err(|e| JwtError::MalformedToken(e.to_string()))
}

/// Outcome of verifying a readable token.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// Whether the signature checks out.
    pub verified: bool,
    /// Decoded header, returned whether or not the signature checked out.
    pub header: Value,
    /// Decoded claims; unvalidated.
    pub payload: Value,
}

/// Verifies tokens against the network public key.
#[derive(Clone)]
pub struct JwtVerifier {
    public_key: Vec<u8>,
    oracle: Arc<dyn SignatureOracle>,
}

impl JwtVerifier {
    /// Verify with the BLS12-381 oracle.
    pub fn new(public_key: NetworkPublicKey) -> Self {
        Self::with_oracle(public_key.to_bytes(), Arc::new(Bls12381Oracle))
    }

    /// Verify with a custom oracle. The key is passed to it untouched.
    pub fn with_oracle(public_key: Vec<u8>, oracle: Arc<dyn SignatureOracle>) -> Self {
        Self { public_key, oracle }
    }

    /// Split, decode, and check a token.
    pub fn verify(&self, jwt: &str) -> Result<VerifiedToken> {
        let segments: Vec<&str> = jwt.split('.').collect();
        let &[header_b64, payload_b64, signature_b64] = segments.as_slice() else {
            return Err(JwtError::MalformedToken(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        };

        let header = decode_json(header_b64, "header")?;
        let payload = decode_json(payload_b64, "payload")?;

        let verified = match decode_segment(signature_b64) {
            Ok(signature) => {
                let signing_input = &jwt[..header_b64.len() + 1 + payload_b64.len()];
                match self
                    .oracle
                    .verify(&self.public_key, &signature, signing_input.as_bytes())
                {
                    Ok(ok) => ok,
                    Err(e) => {
                        warn!(error = %e, "signature oracle failed");
                        false
                    }
                }
            }
            Err(_) => {
                debug!("signature segment is not base64url");
                false
            }
        };

        Ok(VerifiedToken {
            verified,
            header,
            payload,
        })
    }
}

fn decode_json(segment: &str, what: &str) -> Result<Value> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|e| JwtError::MalformedToken(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| JwtError::MalformedToken(format!("{what}: {e}")))
}
