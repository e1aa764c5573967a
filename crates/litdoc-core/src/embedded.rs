//! Runtime state embedded in a packaged document.
//!
//! The field names are a stable contract with the in-document runtime:
//! `encryptedZipDataUrl`, `accessControlConditions`, `chain`,
//! `encryptedSymmetricKey`, `locked`, `useLitPostMessageProxy`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State a document carries for its unlock runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedState {
    /// Inline reference to the encrypted bundle.
    pub encrypted_zip_data_url: String,

    /// Canonicalized conditions, in evaluation order.
    pub access_control_conditions: Vec<Value>,

    /// Chain the conditions are evaluated on.
    pub chain: String,

    /// Hex of the condition-gated ciphertext of the bundle key.
    pub encrypted_symmetric_key: String,

    /// Always `true` in a freshly packaged document.
    pub locked: bool,

    /// Whether key requests go to the parent frame instead of the network.
    pub use_lit_post_message_proxy: bool,
}

impl EmbeddedState {
    /// Names under which the runtime exposes each field.
    pub const FIELD_NAMES: [&'static str; 6] = [
        "encryptedZipDataUrl",
        "accessControlConditions",
        "chain",
        "encryptedSymmetricKey",
        "locked",
        "useLitPostMessageProxy",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_under_stable_names() {
        let state = EmbeddedState {
            encrypted_zip_data_url: "data:application/octet-stream;base64,AA==".into(),
            access_control_conditions: vec![json!({ "operator": "or" })],
            chain: "polygon".into(),
            encrypted_symmetric_key: "00ff".into(),
            locked: true,
            use_lit_post_message_proxy: false,
        };

        let value = serde_json::to_value(&state).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, EmbeddedState::FIELD_NAMES.to_vec());
        assert!(value["accessControlConditions"].is_array());
    }
}
