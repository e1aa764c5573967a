//! Messages exchanged with the key-release network and the parent frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command name of a proxied key request.
pub const GET_ENCRYPTION_KEY_COMMAND: &str = "getEncryptionKey";
/// Target of a proxied key request.
pub const LIT_NODE_CLIENT_TARGET: &str = "LitNodeClient";

/// Wallet-produced proof of account ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSig {
    /// Signature over `signed_message`.
    pub sig: String,
    /// How the signature was produced, e.g. `web3.eth.personal.sign`.
    pub derived_via: String,
    /// The message the wallet signed.
    pub signed_message: String,
    /// Account address.
    pub address: String,
}

/// Parameters of a key release request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRequest {
    /// Canonicalized conditions the key is gated on.
    pub access_control_conditions: Vec<Value>,
    /// Hex of the gated key ciphertext.
    pub to_decrypt: String,
    /// Proof of the requester's account.
    pub auth_sig: AuthSig,
    /// Chain the conditions are evaluated on.
    pub chain: String,
}

/// Message posted to the parent frame in proxy mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMessage {
    /// Action the parent should run, e.g. [`GET_ENCRYPTION_KEY_COMMAND`].
    pub command: String,
    /// Object in the parent that handles `command`.
    pub target: String,
    pub params: KeyRequest,
}

impl FrameMessage {
    /// Ask the parent frame to fetch the key on the document's behalf.
    pub fn get_encryption_key(params: KeyRequest) -> Self {
        Self {
            command: GET_ENCRYPTION_KEY_COMMAND.to_string(),
            target: LIT_NODE_CLIENT_TARGET.to_string(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_message_wire_shape() {
        let message = FrameMessage::get_encryption_key(KeyRequest {
            access_control_conditions: vec![json!({ "operator": "and" })],
            to_decrypt: "abcd".into(),
            auth_sig: AuthSig {
                sig: "0x01".into(),
                derived_via: "web3.eth.personal.sign".into(),
                signed_message: "I am creating an account".into(),
                address: "0xabc".into(),
            },
            chain: "ethereum".into(),
        });

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "command": "getEncryptionKey",
                "target": "LitNodeClient",
                "params": {
                    "accessControlConditions": [{ "operator": "and" }],
                    "toDecrypt": "abcd",
                    "authSig": {
                        "sig": "0x01",
                        "derivedVia": "web3.eth.personal.sign",
                        "signedMessage": "I am creating an account",
                        "address": "0xabc"
                    },
                    "chain": "ethereum"
                }
            })
        );
    }
}
