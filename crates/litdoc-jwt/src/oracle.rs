//! Pairing-based signature checks.
//!
//! Tokens are signed by a threshold signer whose aggregate public key is
//! a BLS12-381 G1 point; signatures are G2 points over the token's
//! signing input hashed to G2.

use ark_bls12_381::{g2, Bls12_381, G1Affine, G2Affine, G2Projective};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::HashToCurve;
use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use sha2::Sha256;

use crate::error::{JwtError, Result};

/// Domain separation tag for message hashing.
pub const SIGNATURE_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// Compressed G1 public key length.
pub const PUBLIC_KEY_LEN: usize = 48;
/// Compressed G2 signature length.
pub const SIGNATURE_LEN: usize = 96;

type G2Hasher = MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

/// The network's aggregate public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkPublicKey(G1Affine);

impl NetworkPublicKey {
    /// Decode a compressed G1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(JwtError::InvalidPublicKey(format!(
                "expected {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let point = G1Affine::deserialize_compressed(bytes)
            .map_err(|e| JwtError::InvalidPublicKey(e.to_string()))?;
        if point.is_zero() {
            return Err(JwtError::InvalidPublicKey("identity point".into()));
        }
        Ok(Self(point))
    }

    /// Decode from hex, the form the key is published in.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| JwtError::InvalidPublicKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already decoded point.
    pub fn from_point(point: G1Affine) -> Self {
        Self(point)
    }

    /// Compressed encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PUBLIC_KEY_LEN);
        self.0
            .serialize_compressed(&mut out)
            .expect("serializing into a Vec never fails");
        out
    }

    /// The underlying G1 point.
    pub fn point(&self) -> &G1Affine {
        &self.0
    }
}

/// Answers whether `signature` is a valid signature on `message`.
///
/// Arguments are raw bytes so alternative backends can plug in without
/// depending on this crate's curve types.
pub trait SignatureOracle: Send + Sync {
    fn verify(&self, public_key: &[u8], signature: &[u8], message: &[u8]) -> Result<bool>;
}

/// Map a message onto G2 with the signature domain tag.
pub fn hash_to_g2(message: &[u8]) -> Result<G2Affine> {
    let hasher = G2Hasher::new(SIGNATURE_DST).map_err(|e| JwtError::HashToCurve(e.to_string()))?;
    hasher
        .hash(message)
        .map_err(|e| JwtError::HashToCurve(e.to_string()))
}

/// BLS12-381 verification: `e(pk, H(m)) == e(g1, sig)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bls12381Oracle;

impl SignatureOracle for Bls12381Oracle {
    fn verify(&self, public_key: &[u8], signature: &[u8], message: &[u8]) -> Result<bool> {
        let public_key = NetworkPublicKey::from_bytes(public_key)?;
        if signature.len() != SIGNATURE_LEN {
            return Err(JwtError::InvalidSignature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                signature.len()
            )));
        }
        let signature = G2Affine::deserialize_compressed(signature)
            .map_err(|e| JwtError::InvalidSignature(e.to_string()))?;
        let hashed = hash_to_g2(message)?;

        let lhs = Bls12_381::pairing(*public_key.point(), hashed);
        let rhs = Bls12_381::pairing(G1Affine::generator(), signature);
        Ok(lhs == rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ec::CurveGroup;
    use ark_ff::PrimeField;

    fn keypair(seed: &[u8]) -> (Fr, NetworkPublicKey) {
        let secret = Fr::from_le_bytes_mod_order(seed);
        let public = (G1Affine::generator() * secret).into_affine();
        (secret, NetworkPublicKey::from_point(public))
    }

    fn sign(secret: Fr, message: &[u8]) -> Vec<u8> {
        let point = (hash_to_g2(message).unwrap() * secret).into_affine();
        let mut out = Vec::new();
        point.serialize_compressed(&mut out).unwrap();
        out
    }

    #[test]
    fn test_valid_signature_verifies() {
        let (secret, public) = keypair(b"network secret");
        let signature = sign(secret, b"header.payload");
        assert_eq!(signature.len(), SIGNATURE_LEN);

        let ok = Bls12381Oracle
            .verify(&public.to_bytes(), &signature, b"header.payload")
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_other_message_fails() {
        let (secret, public) = keypair(b"network secret");
        let signature = sign(secret, b"header.payload");

        let ok = Bls12381Oracle
            .verify(&public.to_bytes(), &signature, b"header.payloaD")
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_other_key_fails() {
        let (secret, _) = keypair(b"network secret");
        let (_, other) = keypair(b"someone else");
        let signature = sign(secret, b"m");

        assert!(!Bls12381Oracle
            .verify(&other.to_bytes(), &signature, b"m")
            .unwrap());
    }

    #[test]
    fn test_short_signature_is_error() {
        let (_, public) = keypair(b"k");
        assert!(matches!(
            Bls12381Oracle.verify(&public.to_bytes(), &[0u8; 10], b"m"),
            Err(JwtError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_public_key_hex_round_trip() {
        let (_, public) = keypair(b"k");
        let hex_key = hex::encode(public.to_bytes());

        assert_eq!(NetworkPublicKey::from_hex(&hex_key).unwrap(), public);
        assert!(matches!(
            NetworkPublicKey::from_hex("zz"),
            Err(JwtError::InvalidPublicKey(_))
        ));
        assert!(NetworkPublicKey::from_hex(&"00".repeat(48)).is_err());
    }

    #[test]
    fn test_hash_to_g2_is_deterministic() {
        assert_eq!(hash_to_g2(b"abc").unwrap(), hash_to_g2(b"abc").unwrap());
        assert_ne!(hash_to_g2(b"abc").unwrap(), hash_to_g2(b"abd").unwrap());
    }
}
