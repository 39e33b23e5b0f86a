//! SCHEMA domain: credential schemas and credential definition lookups.

pub mod client;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::ledger::constants::marker;
use crate::shared::Did;

/// Schema body, shared by the write payload and decoded GET_SCHEMA data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    pub version: String,
    /// Empty when a GET_SCHEMA found nothing.
    #[serde(default)]
    pub attr_names: Vec<String>,
}

/// Decoded `data` of a GET_SCHEMA reply.
pub type SchemaData = SchemaDefinition;

/// Publishes a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub data: SchemaDefinition,
}

impl Schema {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        attr_names: Vec<String>,
    ) -> Result<Self, BuildError> {
        if attr_names.is_empty() {
            return Err(BuildError::MissingField("attr_names"));
        }
        Ok(Self {
            data: SchemaDefinition {
                name: name.into(),
                version: version.into(),
                attr_names,
            },
        })
    }

    /// Ledger id of this schema once published by `issuer`.
    pub fn id(&self, issuer: &Did) -> String {
        format!(
            "{}:{}:{}:{}",
            issuer.unqualified(),
            marker::SCHEMA,
            self.data.name,
            self.data.version
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameVersion {
    pub name: String,
    pub version: String,
}

/// Reads a schema by issuer, name and version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetSchema {
    pub dest: Did,
    pub data: NameVersion,
}

impl GetSchema {
    pub fn new(issuer: impl Into<Did>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            dest: issuer.into(),
            data: NameVersion {
                name: name.into(),
                version: version.into(),
            },
        }
    }

    /// Parses `<issuer>:2:<name>:<version>`.
    pub fn from_schema_id(schema_id: &str) -> Result<Self, BuildError> {
        let parts: Vec<&str> = schema_id.split(':').collect();
        match parts.as_slice() {
            [issuer, m, name, version] if *m == marker::SCHEMA => {
                Ok(Self::new(*issuer, *name, *version))
            }
            _ => Err(BuildError::InvalidIdentifier(schema_id.to_string())),
        }
    }
}

/// Reads a credential definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetClaimDef {
    /// Sequence number of the schema transaction.
    #[serde(rename = "ref")]
    pub schema_ref: i32,
    pub signature_type: String,
    pub origin: Did,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl GetClaimDef {
    pub fn new(origin: impl Into<Did>, schema_ref: i32, tag: Option<String>) -> Self {
        Self {
            schema_ref,
            signature_type: marker::CL_SIGNATURE_TYPE.to_string(),
            origin: origin.into(),
            tag,
        }
    }

    /// Parses `<issuer>:3:CL:<schema seqNo>[:<tag>]`.
    pub fn from_cred_def_id(cred_def_id: &str) -> Result<Self, BuildError> {
        let invalid = || BuildError::InvalidIdentifier(cred_def_id.to_string());
        let parts: Vec<&str> = cred_def_id.splitn(5, ':').collect();
        let (origin, m, signature_type, schema_ref, tag) = match parts.as_slice() {
            [origin, m, sig, schema_ref] => (*origin, *m, *sig, *schema_ref, None),
            [origin, m, sig, schema_ref, tag] => {
                (*origin, *m, *sig, *schema_ref, Some(tag.to_string()))
            }
            _ => return Err(invalid()),
        };
        if m != marker::CRED_DEF || origin.is_empty() {
            return Err(invalid());
        }
        let schema_ref = schema_ref.parse::<i32>().map_err(|_| invalid())?;
        Ok(Self {
            schema_ref,
            signature_type: signature_type.to_string(),
            origin: origin.into(),
            tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_requires_attributes() {
        assert_eq!(
            Schema::new("gvt", "1.0", vec![]),
            Err(BuildError::MissingField("attr_names"))
        );
    }

    #[test]
    fn test_schema_payload_and_id() {
        let schema = Schema::new("gvt", "1.0", vec!["name".into(), "age".into()]).unwrap();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"data": {"name": "gvt", "version": "1.0", "attr_names": ["name", "age"]}})
        );
        assert_eq!(
            schema.id(&Did::new("V4SGRU86Z58d6TV7PBUe6f")),
            "V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0"
        );
    }

    #[test]
    fn test_get_schema_from_id() {
        let get = GetSchema::from_schema_id("V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0").unwrap();
        assert_eq!(get.dest.as_str(), "V4SGRU86Z58d6TV7PBUe6f");
        assert_eq!(get.data.name, "gvt");
        assert_eq!(get.data.version, "1.0");
        assert!(GetSchema::from_schema_id("V4SGRU86Z58d6TV7PBUe6f:3:gvt:1.0").is_err());
        assert!(GetSchema::from_schema_id("garbage").is_err());
    }

    #[test]
    fn test_get_claim_def_from_id() {
        let get = GetClaimDef::from_cred_def_id("V4SGRU86Z58d6TV7PBUe6f:3:CL:17:default").unwrap();
        assert_eq!(
            serde_json::to_value(&get).unwrap(),
            json!({"ref": 17, "signature_type": "CL", "origin": "V4SGRU86Z58d6TV7PBUe6f", "tag": "default"})
        );
        let untagged = GetClaimDef::from_cred_def_id("V4SGRU86Z58d6TV7PBUe6f:3:CL:17").unwrap();
        assert_eq!(untagged.tag, None);
        assert!(GetClaimDef::from_cred_def_id("V4SGRU86Z58d6TV7PBUe6f:3:CL:x:tag").is_err());
        assert!(GetClaimDef::from_cred_def_id("V4SGRU86Z58d6TV7PBUe6f:2:CL:17").is_err());
    }
}
