//! Rich schema domain: rich schemas and JSON-LD contexts.
//!
//! Both are versioned, content-addressed ledger objects with the same
//! envelope; `rsType` tells them apart.

pub mod client;

use serde::Serialize;

use crate::error::BuildError;
use crate::ledger::constants::rich_object;
use crate::shared::Did;

/// A rich schema or context object.
///
/// Build with [`RichObject::schema`] or [`RichObject::context`]; converting
/// into an [`Operation`](crate::ledger::Operation) picks the variant from
/// `rsType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichObject {
    id: String,
    /// JSON document carried as a string.
    content: String,
    rs_name: String,
    rs_version: String,
    rs_type: String,
    ver: String,
}

impl RichObject {
    pub fn schema(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        content: &str,
    ) -> Result<Self, BuildError> {
        Self::build(id, name, version, content, rich_object::SCHEMA_TYPE)
    }

    pub fn context(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        content: &str,
    ) -> Result<Self, BuildError> {
        Self::build(id, name, version, content, rich_object::CONTEXT_TYPE)
    }

    fn build(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        content: &str,
        rs_type: &str,
    ) -> Result<Self, BuildError> {
        serde_json::from_str::<serde_json::Value>(content).map_err(|e| {
            BuildError::InvalidField {
                field: "content",
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            id: id.into(),
            content: content.to_string(),
            rs_name: name.into(),
            rs_version: version.into(),
            rs_type: rs_type.to_string(),
            ver: rich_object::FORMAT_VERSION.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn rs_type(&self) -> &str {
        &self.rs_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichObjectName {
    pub name: String,
    pub version: String,
}

/// Looks up a rich schema or context by issuer, name and version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetRichObject {
    pub dest: Did,
    pub data: RichObjectName,
}

impl GetRichObject {
    pub fn new(dest: impl Into<Did>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            data: RichObjectName {
                name: name.into(),
                version: version.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Operation, TxnType};
    use serde_json::json;

    const CONTEXT: &str = r#"{"@context": {"@version": 1.1, "name": "http://schema.org/name"}}"#;

    #[test]
    fn test_context_payload() {
        let ctx = RichObject::context(
            "did:sov:2f9F8ZmxuvDqRiqqY29x6dx9oU4qwFTkPbDpWtwGbdUsrCD",
            "ISO18013_DriverLicenseContext",
            "1.0",
            CONTEXT,
        )
        .unwrap();
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["rsType"], "ctx");
        assert_eq!(value["ver"], "2");
        assert_eq!(value["rsName"], "ISO18013_DriverLicenseContext");
        assert_eq!(value["content"], json!(CONTEXT));
    }

    #[test]
    fn test_operation_variant_follows_rs_type() {
        let ctx = RichObject::context("id1", "n", "1.0", CONTEXT).unwrap();
        let sch = RichObject::schema("id2", "n", "1.0", "{}").unwrap();
        assert_eq!(Operation::from(ctx).txn_type(), Some(TxnType::SetContext));
        assert_eq!(Operation::from(sch).txn_type(), Some(TxnType::SetRichSchema));
    }

    #[test]
    fn test_content_must_be_json() {
        let err = RichObject::schema("id", "n", "1.0", "{not json").unwrap_err();
        assert!(matches!(err, BuildError::InvalidField { field: "content", .. }));
    }
}
