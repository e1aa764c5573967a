//! Token verification against a deterministic BLS12-381 signer.

use litdoc_jwt::{decode_segment, encode_segment, JwtError, JwtVerifier, NetworkPublicKey};
use litdoc_testkit::{token_header, token_payload, TokenSigner};
use proptest::prelude::*;

fn verifier(signer: &TokenSigner) -> JwtVerifier {
    JwtVerifier::new(signer.public_key())
}

#[test]
fn signed_token_verifies() {
    let signer = TokenSigner::test_network();
    let jwt = signer.sign_token(&token_header(), &token_payload());

    let token = verifier(&signer).verify(&jwt).unwrap();

    assert!(token.verified);
    assert_eq!(token.header, token_header());
    assert_eq!(token.payload, token_payload());
}

#[test]
fn published_hex_key_verifies() {
    let signer = TokenSigner::test_network();
    let key = NetworkPublicKey::from_hex(&signer.public_key_hex()).unwrap();
    let jwt = signer.sign_token(&token_header(), &token_payload());

    assert!(JwtVerifier::new(key).verify(&jwt).unwrap().verified);
}

#[test]
fn other_signer_does_not_verify() {
    let signer = TokenSigner::test_network();
    let impostor = TokenSigner::from_seed(b"impostor");
    let jwt = impostor.sign_token(&token_header(), &token_payload());

    assert!(!verifier(&signer).verify(&jwt).unwrap().verified);
}

#[test]
fn swapped_payload_does_not_verify() {
    let signer = TokenSigner::test_network();
    let jwt = signer.sign_token(&token_header(), &token_payload());

    let mut payload = token_payload();
    payload["path"] = "/admin".into();
    let parts: Vec<&str> = jwt.split('.').collect();
    let forged = format!(
        "{}.{}.{}",
        parts[0],
        encode_segment(payload.to_string().as_bytes()),
        parts[2]
    );

    let token = verifier(&signer).verify(&forged).unwrap();
    assert!(!token.verified);
    assert_eq!(token.payload["path"], "/admin");
}

#[test]
fn garbage_signature_is_unverified_not_error() {
    let signer = TokenSigner::test_network();
    let jwt = signer.sign_token(&token_header(), &token_payload());
    let (signing_input, _) = jwt.rsplit_once('.').unwrap();

    for signature in ["", "AAAA", "not base64!"] {
        let token = verifier(&signer)
            .verify(&format!("{signing_input}.{signature}"))
            .unwrap();
        assert!(!token.verified);
    }
}

#[test]
fn malformed_tokens_are_rejected() {
    let signer = TokenSigner::test_network();
    let verifier = verifier(&signer);

    for jwt in ["", "onlyone", "two.parts", "a.b.c.d", "%%%.e30.AAAA", "e30.%%%.AAAA"] {
        assert!(
            matches!(verifier.verify(jwt), Err(JwtError::MalformedToken(_))),
            "{jwt} should be malformed"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_changed_signing_byte_fails(index in any::<prop::sample::Index>(), replacement in "[A-Za-z0-9_-]") {
        let signer = TokenSigner::test_network();
        let jwt = signer.sign_token(&token_header(), &token_payload());
        prop_assert!(verifier(&signer).verify(&jwt).unwrap().verified);
        let (signing_input, signature) = jwt.rsplit_once('.').unwrap();

        // Only positions inside the two base64 segments, never the dot.
        let positions: Vec<usize> = signing_input
            .char_indices()
            .filter(|(_, c)| *c != '.')
            .map(|(i, _)| i)
            .collect();
        let at = positions[index.index(positions.len())];
        prop_assume!(signing_input[at..at + 1] != replacement);

        let mut tampered = signing_input.to_string();
        tampered.replace_range(at..at + 1, &replacement);
        let (header, payload) = tampered.split_once('.').unwrap();

        let result = verifier(&signer).verify(&format!("{tampered}.{signature}"));
        match (decode_json(header), decode_json(payload)) {
            (Some(header), Some(payload)) => {
                let token = result.unwrap();
                prop_assert!(!token.verified);
                prop_assert_eq!(token.header, header);
                prop_assert_eq!(token.payload, payload);
            }
            _ => prop_assert!(matches!(result, Err(JwtError::MalformedToken(_)))),
        }
    }
}

fn decode_json(segment: &str) -> Option<serde_json::Value> {
    let bytes = decode_segment(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}
