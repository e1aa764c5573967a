//! Properties of the archive and bundle cipher.

use litdoc_core::{
    bundle_data_url, bundle_from_data_url, decrypt_bundle, encrypt_files, encrypt_text,
    CoreError, SymmetricKey, ASSET_FOLDER,
};
use litdoc_testkit::generators::{file_set, payload, text};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn text_round_trips(content in text()) {
        let sealed = encrypt_text(&content).unwrap();
        let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();
        prop_assert_eq!(archive.primary_text().unwrap(), content.as_str());
    }

    #[test]
    fn file_sets_round_trip(files in file_set()) {
        let sealed = encrypt_files(files.clone()).unwrap();
        let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();

        prop_assert_eq!(archive.len(), files.len());
        for (name, data) in &files {
            let entry = archive.entry(&format!("{ASSET_FOLDER}/{name}")).unwrap();
            prop_assert_eq!(entry.as_bytes(), data.as_slice());
        }
    }

    #[test]
    fn wrong_key_never_opens(content in text()) {
        let sealed = encrypt_text(&content).unwrap();
        let other = SymmetricKey::generate();
        prop_assert!(matches!(
            decrypt_bundle(&sealed.bundle, &other),
            Err(CoreError::DecryptionFailure)
        ));
    }

    #[test]
    fn any_flipped_bit_is_detected(data in payload(256), index in any::<prop::sample::Index>(), bit in 0u8..8) {
        let sealed = encrypt_files([("blob.bin", data)]).unwrap();
        let mut bundle = sealed.bundle.clone();
        let i = index.index(bundle.ciphertext.len());
        bundle.ciphertext[i] ^= 1 << bit;

        prop_assert!(matches!(
            decrypt_bundle(&bundle, &sealed.key),
            Err(CoreError::DecryptionFailure)
        ));
    }

    #[test]
    fn data_url_preserves_bundle(content in text()) {
        let sealed = encrypt_text(&content).unwrap();
        let url = bundle_data_url(&sealed.bundle);
        prop_assert_eq!(bundle_from_data_url(&url).unwrap(), sealed.bundle);
    }
}

#[test]
fn hello_round_trip() {
    let sealed = encrypt_text("hello").unwrap();
    let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();

    assert_eq!(archive.names().collect::<Vec<_>>(), vec!["string.txt"]);
    assert_eq!(archive.primary_text().unwrap(), "hello");
}

#[test]
fn two_file_round_trip() {
    let sealed = encrypt_files([
        ("a.png", vec![0x89, b'P', b'N', b'G']),
        ("b.txt", b"second".to_vec()),
    ])
    .unwrap();
    let archive = decrypt_bundle(&sealed.bundle, &sealed.key).unwrap();

    assert_eq!(
        archive.names().collect::<Vec<_>>(),
        vec!["encryptedAssets/a.png", "encryptedAssets/b.txt"]
    );
    assert_eq!(
        archive.entry("encryptedAssets/b.txt").unwrap().as_text().unwrap(),
        "second"
    );
}

#[test]
fn keys_are_unique_per_bundle() {
    let keys: Vec<SymmetricKey> = (0..32)
        .map(|_| encrypt_text("same content").unwrap().key)
        .collect();

    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let result = encrypt_files([("same.txt", b"1".to_vec()), ("same.txt", b"2".to_vec())]);
    assert!(matches!(result, Err(CoreError::DuplicateEntryName(name)) if name == "same.txt"));
}
