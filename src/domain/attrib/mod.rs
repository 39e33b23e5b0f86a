//! ATTRIB domain: attributes attached to a DID (endpoints, hashes, blobs).

pub mod client;

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::shared::Did;

/// Exactly one of `raw`, `hash` or `enc`; the enum makes the other two
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttribValue {
    /// JSON document, as a string.
    Raw(String),
    /// Hex SHA-256 of data kept off-ledger.
    Hash(String),
    /// Encrypted value.
    Enc(String),
}

/// Writes an attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attrib {
    pub dest: Did,
    #[serde(flatten)]
    pub value: AttribValue,
}

impl Attrib {
    pub fn raw(dest: impl Into<Did>, data: &Value) -> Self {
        Self {
            dest: dest.into(),
            value: AttribValue::Raw(data.to_string()),
        }
    }

    /// Stores only the hash of `data`.
    pub fn hashed(dest: impl Into<Did>, data: &[u8]) -> Self {
        Self {
            dest: dest.into(),
            value: AttribValue::Hash(hex::encode(Sha256::digest(data))),
        }
    }

    pub fn encrypted(dest: impl Into<Did>, enc: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            value: AttribValue::Enc(enc.into()),
        }
    }

    /// Agent endpoint: raw `{"endpoint":{"endpoint":<url>}}`.
    pub fn endpoint(dest: impl Into<Did>, url: &str) -> Self {
        Self::raw(dest, &json!({ "endpoint": { "endpoint": url } }))
    }
}

/// Reads an attribute by name (`raw`), hash or encrypted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetAttrib {
    pub dest: Did,
    #[serde(flatten)]
    pub value: AttribValue,
    #[serde(rename = "seqNo", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl GetAttrib {
    pub fn new(dest: impl Into<Did>, value: AttribValue) -> Self {
        Self {
            dest: dest.into(),
            value,
            seq_no: None,
            timestamp: None,
        }
    }

    pub fn raw(dest: impl Into<Did>, name: impl Into<String>) -> Self {
        Self::new(dest, AttribValue::Raw(name.into()))
    }

    pub fn endpoint(dest: impl Into<Did>) -> Self {
        Self::raw(dest, "endpoint")
    }

    pub fn at_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Pulls the URL out of a decoded endpoint attribute.
///
/// Read replies carry `{"endpoint":{"endpoint":"..."}}`.
pub fn endpoint_from_data(data: &Value) -> Option<&str> {
    data.get("endpoint")?.get("endpoint")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_attrib() {
        let attrib = Attrib::hashed("V4SGRU86Z58d6TV7PBUe6f", b"cool hash");
        assert_eq!(
            attrib.value,
            AttribValue::Hash(
                "46aa0c92129b33ee72ee1478d2ae62fa6e756869dedc6c858af3214a6fcf1904".to_string()
            )
        );
    }

    #[test]
    fn test_get_attrib_endpoint() {
        let value = serde_json::to_value(GetAttrib::endpoint("V4SGRU86Z58d6TV7PBUe6f")).unwrap();
        assert_eq!(
            value,
            json!({"dest": "V4SGRU86Z58d6TV7PBUe6f", "raw": "endpoint"})
        );
    }

    #[test]
    fn test_endpoint_from_data() {
        let data = json!({"endpoint": {"endpoint": "http://10.0.0.2:8020"}});
        assert_eq!(endpoint_from_data(&data), Some("http://10.0.0.2:8020"));
        assert_eq!(endpoint_from_data(&json!({"other": 1})), None);
    }
}
