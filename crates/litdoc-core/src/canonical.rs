//! Canonical form of access-control conditions.
//!
//! Conditions are opaque to this crate: they are evaluated by the
//! key-release network, never here. Before they are embedded in a
//! document they are reduced to a canonical shape so that the exact bytes
//! the network hashes do not depend on how the caller spelled them:
//!
//! - an array is canonicalized element by element (order preserved);
//! - `{"operator": ..}` keeps only the operator;
//! - a condition with a `returnValueTest` keeps, in this order,
//!   `contractAddress`, `chain`, `standardContractType`, `method`,
//!   `parameters`, and `returnValueTest {comparator, value}`;
//!   absent fields are omitted.
//!
//! Anything else is rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Field order of a canonical condition.
const CONDITION_FIELDS: [&str; 5] = [
    "contractAddress",
    "chain",
    "standardContractType",
    "method",
    "parameters",
];

/// An externally defined predicate such as "holds token X on chain Y".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessControlCondition(pub Value);

impl From<Value> for AccessControlCondition {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Turns a condition into the structure embedded in a document.
pub trait ConditionFormatter: Send + Sync {
    /// Canonicalize one condition.
    fn canonicalize(&self, condition: &AccessControlCondition) -> Result<Value>;
}

/// The canonical formatter understood by the key-release network.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl ConditionFormatter for CanonicalFormatter {
    fn canonicalize(&self, condition: &AccessControlCondition) -> Result<Value> {
        canonical_condition(&condition.0)
    }
}

/// Canonicalize a list of conditions, preserving their order.
pub fn canonicalize_all(
    formatter: &dyn ConditionFormatter,
    conditions: &[AccessControlCondition],
) -> Result<Vec<Value>> {
    conditions.iter().map(|c| formatter.canonicalize(c)).collect()
}

fn canonical_condition(value: &Value) -> Result<Value> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(canonical_condition)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(obj) if obj.contains_key("operator") => {
            let mut out = Map::new();
            out.insert("operator".into(), obj["operator"].clone());
            Ok(Value::Object(out))
        }
        Value::Object(obj) if obj.contains_key("returnValueTest") => {
            let mut out = Map::new();
            for field in CONDITION_FIELDS {
                if let Some(v) = obj.get(field) {
                    out.insert(field.into(), v.clone());
                }
            }

            let test = obj["returnValueTest"].as_object().ok_or_else(|| {
                CoreError::InvalidCondition("returnValueTest must be an object".into())
            })?;
            let mut canonical_test = Map::new();
            for field in ["comparator", "value"] {
                if let Some(v) = test.get(field) {
                    canonical_test.insert(field.into(), v.clone());
                }
            }
            out.insert("returnValueTest".into(), Value::Object(canonical_test));

            Ok(Value::Object(out))
        }
        other => Err(CoreError::InvalidCondition(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nft_condition() -> Value {
        json!({
            "returnValueTest": { "value": "0", "comparator": ">", "extra": true },
            "method": "balanceOf",
            "note": "dropped",
            "chain": "ethereum",
            "parameters": [":userAddress"],
            "standardContractType": "ERC721",
            "contractAddress": "0x3110c39b428221012934A7F617913b095BC1078C",
        })
    }

    #[test]
    fn test_condition_fields_are_ordered_and_filtered() {
        let canonical = CanonicalFormatter
            .canonicalize(&nft_condition().into())
            .unwrap();

        let keys: Vec<_> = canonical.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "contractAddress",
                "chain",
                "standardContractType",
                "method",
                "parameters",
                "returnValueTest"
            ]
        );
        assert_eq!(
            canonical["returnValueTest"],
            json!({ "comparator": ">", "value": "0" })
        );
        assert!(canonical.get("note").is_none());
    }

    #[test]
    fn test_operator_keeps_only_operator() {
        let canonical = CanonicalFormatter
            .canonicalize(&json!({ "operator": "or", "junk": 1 }).into())
            .unwrap();
        assert_eq!(canonical, json!({ "operator": "or" }));
    }

    #[test]
    fn test_nested_groups_preserve_order() {
        let group = json!([nft_condition(), { "operator": "and" }, nft_condition()]);
        let canonical = CanonicalFormatter.canonicalize(&group.into()).unwrap();

        let items = canonical.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], json!({ "operator": "and" }));
    }

    #[test]
    fn test_list_order_preserved() {
        let conditions: Vec<AccessControlCondition> = vec![
            json!({ "operator": "or" }).into(),
            nft_condition().into(),
        ];
        let out = canonicalize_all(&CanonicalFormatter, &conditions).unwrap();
        assert_eq!(out[0], json!({ "operator": "or" }));
        assert!(out[1].get("returnValueTest").is_some());
    }

    #[test]
    fn test_unrecognised_condition_rejected() {
        for bad in [json!({ "chain": "ethereum" }), json!("string"), json!(3)] {
            assert!(matches!(
                CanonicalFormatter.canonicalize(&bad.into()),
                Err(CoreError::InvalidCondition(_))
            ));
        }
    }
}
