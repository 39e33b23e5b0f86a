//! Canonical signing serialization.
//!
//! The bytes a signer sees are not the wire bytes. Every object level is
//! key-sorted, there is no whitespace, and `signature`/`signatures` are
//! absent entirely. Transport encoding ([`Request::to_json`]) has none of
//! these guarantees and must never be signed.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::SerializationError;
use crate::ledger::TxnType;
use crate::request::Request;

/// Which byte form signatures are computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigningFormat {
    /// Key-sorted, whitespace-free JSON.
    #[default]
    CanonicalJson,
    /// Node-native `key:value|key:value` normalization.
    IndyNormalized,
}

/// Canonical JSON bytes of the unsigned request.
pub fn canonicalize(request: &Request) -> Result<Vec<u8>, SerializationError> {
    signing_input(request, SigningFormat::CanonicalJson)
}

/// Bytes an author (or single signer) signs.
pub fn signing_input(request: &Request, format: SigningFormat) -> Result<Vec<u8>, SerializationError> {
    encode(request, format, false)
}

/// Bytes an endorser signs: the request as it stands, author signature
/// included under `signatures`.
pub fn endorsement_input(
    request: &Request,
    format: SigningFormat,
) -> Result<Vec<u8>, SerializationError> {
    encode(request, format, true)
}

fn encode(
    request: &Request,
    format: SigningFormat,
    keep_signatures: bool,
) -> Result<Vec<u8>, SerializationError> {
    let mut value = serde_json::to_value(request)?;
    let Value::Object(map) = &mut value else {
        return Err(SerializationError::NotAnObject);
    };
    map.remove("signature");
    if !keep_signatures {
        map.remove("signatures");
    }

    match format {
        SigningFormat::CanonicalJson => Ok(serde_json::to_vec(&sort_keys(value))?),
        SigningFormat::IndyNormalized => {
            let txn_type = request.operation().type_code().to_string();
            Ok(normalize(&value, true, keep_signatures, &txn_type)?.into_bytes())
        }
    }
}

/// Rebuilds every object with keys in ascending order.
///
/// Insertion is sorted explicitly so the result does not depend on whether
/// serde_json's `preserve_order` feature is active in the build.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

// ─── Indy normalization ──────────────────────────────────────────────────────

/// Normalized form of an arbitrary request value, as ledger nodes compute it.
pub fn indy_normalized(value: &Value) -> Result<String, SerializationError> {
    let txn_type = value["operation"]["type"].as_str().unwrap_or_default().to_string();
    normalize(value, true, false, &txn_type)
}

fn is_attrib_type(txn_type: &str) -> bool {
    txn_type == TxnType::Attrib.code() || txn_type == TxnType::GetAttr.code()
}

fn normalize(
    value: &Value,
    top_level: bool,
    keep_signatures: bool,
    txn_type: &str,
) -> Result<String, SerializationError> {
    match value {
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| normalize(item, false, keep_signatures, txn_type))
            .collect::<Result<Vec<_>, _>>()?
            .join(",")),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut parts = Vec::with_capacity(keys.len());
            for key in keys {
                if top_level
                    && (key == "signature"
                        || key == "fees"
                        || (key == "signatures" && !keep_signatures))
                {
                    continue;
                }
                let field = &map[key.as_str()];
                let rendered = if is_attrib_type(txn_type)
                    && (key == "raw" || key == "hash" || key == "enc")
                {
                    let text = field
                        .as_str()
                        .ok_or_else(|| SerializationError::AttribNotString(key.clone()))?;
                    hex::encode(Sha256::digest(text.as_bytes()))
                } else {
                    normalize(field, false, keep_signatures, txn_type)?
                };
                parts.push(format!("{}:{}", key, rendered));
            }
            Ok(parts.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attrib::Attrib;
    use crate::domain::nym::{GetNym, Nym};
    use crate::ledger::{Operation, Role};
    use serde_json::json;

    fn nym_request() -> Request {
        Request::builder(
            Nym::new("V4SGRU86Z58d6TV7PBUe6f").with_role(Role::Endorser),
            "Th7MpTaRZVRYnPiabds81Y",
        )
        .req_id(1_514_215_425)
        .build()
    }

    #[test]
    fn test_canonical_json_is_sorted_and_compact() {
        let bytes = canonicalize(&nym_request()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"identifier":"Th7MpTaRZVRYnPiabds81Y","operation":{"dest":"V4SGRU86Z58d6TV7PBUe6f","role":"101","type":"1"},"protocolVersion":2,"reqId":1514215425}"#
        );
    }

    #[test]
    fn test_canonicalize_is_deterministic() {
        let request = nym_request();
        let first = canonicalize(&request).unwrap();
        for _ in 0..5 {
            assert_eq!(canonicalize(&request).unwrap(), first);
        }
    }

    #[test]
    fn test_canonicalize_ignores_insertion_order() {
        let mut forward = Map::new();
        forward.insert("type".into(), json!("105"));
        forward.insert("dest".into(), json!("FzAaV9Waa1DccDa72qwg13"));
        forward.insert("meta".into(), json!({"z": 1, "a": [{"y": 2, "b": 3}]}));

        let mut backward = Map::new();
        backward.insert("meta".into(), json!({"a": [{"b": 3, "y": 2}], "z": 1}));
        backward.insert("dest".into(), json!("FzAaV9Waa1DccDa72qwg13"));
        backward.insert("type".into(), json!("105"));

        let build = |fields: Map<String, Value>| {
            Request::builder(Operation::custom(Value::Object(fields)).unwrap(), "LibindyDid111111111111")
                .req_id(5)
                .build()
        };
        assert_eq!(
            canonicalize(&build(forward)).unwrap(),
            canonicalize(&build(backward)).unwrap()
        );
    }

    #[test]
    fn test_canonical_bytes_never_carry_signatures() {
        let request = nym_request();
        let text = String::from_utf8(canonicalize(&request).unwrap()).unwrap();
        assert!(!text.contains("\"signature\""));
        assert!(!text.contains("\"signatures\""));
        assert!(!text.contains(' '));
    }

    #[test]
    fn test_get_nym_canonical_form() {
        let request = Request::builder(GetNym::new("FzAaV9Waa1DccDa72qwg13"), "LibindyDid111111111111")
            .req_id(1)
            .build();
        assert_eq!(
            String::from_utf8(canonicalize(&request).unwrap()).unwrap(),
            r#"{"identifier":"LibindyDid111111111111","operation":{"dest":"FzAaV9Waa1DccDa72qwg13","type":"105"},"protocolVersion":2,"reqId":1}"#
        );
    }

    #[test]
    fn test_indy_normalized_nested_values() {
        let msg = json!({
            "name": "John Doe",
            "age": 43,
            "operation": {"dest": 54},
            "phones": ["1234567", "2345678", {"rust": 5, "age": 1}, 3]
        });
        assert_eq!(
            indy_normalized(&msg).unwrap(),
            "age:43|name:John Doe|operation:dest:54|phones:1234567,2345678,age:1|rust:5,3"
        );
    }

    #[test]
    fn test_indy_normalized_skips_signature_fields() {
        let msg = json!({
            "name": "John Doe",
            "operation": {"type": "100", "hash": "cool hash", "dest": 54},
            "fees": "fees1",
            "signature": "sign1",
            "signatures": "sign-m",
            "flag": true,
            "empty": null
        });
        assert_eq!(
            indy_normalized(&msg).unwrap(),
            "empty:|flag:True|name:John Doe|operation:dest:54|hash:46aa0c92129b33ee72ee1478d2ae62fa6e756869dedc6c858af3214a6fcf1904|type:100"
        );
    }

    #[test]
    fn test_indy_normalized_hashes_only_attrib_types() {
        let msg = json!({"operation": {"type": "101", "raw": "string for hash"}});
        assert_eq!(
            indy_normalized(&msg).unwrap(),
            "operation:raw:string for hash|type:101"
        );
    }

    #[test]
    fn test_indy_format_for_attrib_request() {
        let request = Request::builder(
            Attrib::hashed("V4SGRU86Z58d6TV7PBUe6f", b"ignored"),
            "V4SGRU86Z58d6TV7PBUe6f",
        )
        .req_id(3)
        .build();
        let text = String::from_utf8(signing_input(&request, SigningFormat::IndyNormalized).unwrap()).unwrap();
        assert!(text.starts_with("identifier:V4SGRU86Z58d6TV7PBUe6f|operation:dest:V4SGRU86Z58d6TV7PBUe6f|hash:"));
        assert!(text.ends_with("|type:100|protocolVersion:2|reqId:3"));
    }
}
