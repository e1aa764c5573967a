//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

/// Arbitrary printable text, including multi-byte characters.
pub fn text() -> impl Strategy<Value = String> {
    "\\PC{0,200}"
}

/// Payload bytes of at most `max_len`.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// A valid file name, optionally nested one level.
pub fn file_name() -> impl Strategy<Value = String> {
    "([a-z]{1,8}/)?[a-z][a-z0-9_-]{0,15}(\\.[a-z]{1,4})?".prop_map(String::from)
}

/// A set of uniquely named files.
pub fn file_set() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::btree_map(file_name(), payload(512), 1..8)
        .prop_map(|files| files.into_iter().collect())
}

/// A chain identifier.
pub fn chain() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ethereum".to_string()),
        Just("polygon".to_string()),
        Just("fantom".to_string()),
        Just("xdai".to_string()),
    ]
}

/// An access-control condition, either an operator or a return-value test.
pub fn condition() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop_oneof![Just("and"), Just("or")].prop_map(|op| json!({ "operator": op })),
        (chain(), "0x[0-9a-f]{40}", prop_oneof![Just(">"), Just(">="), Just("=")], 0u32..100)
            .prop_map(|(chain, address, comparator, value)| {
                json!({
                    "contractAddress": address,
                    "chain": chain,
                    "standardContractType": "ERC721",
                    "method": "balanceOf",
                    "parameters": [":userAddress"],
                    "returnValueTest": { "comparator": comparator, "value": value.to_string() }
                })
            }),
    ]
}
