//! NYM domain: identity records (DID, verkey, role).

pub mod client;
pub mod wire;

use serde::Serialize;
use serde_json::Value;

use crate::ledger::constants::Role;
use crate::shared::Did;

pub use wire::NymData;

/// Creates or updates a DID's identity record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nym {
    pub dest: Did,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// DID document fragment, carried as a JSON string.
    #[serde(rename = "diddocContent", skip_serializing_if = "Option::is_none")]
    pub diddoc_content: Option<String>,
}

impl Nym {
    pub fn new(dest: impl Into<Did>) -> Self {
        Self {
            dest: dest.into(),
            verkey: None,
            alias: None,
            role: None,
            diddoc_content: None,
        }
    }

    /// Full or abbreviated (`~`-prefixed) verkey.
    pub fn with_verkey(mut self, verkey: impl Into<String>) -> Self {
        self.verkey = Some(verkey.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_diddoc_content(mut self, content: &Value) -> Self {
        self.diddoc_content = Some(content.to_string());
        self
    }
}

/// Reads a DID's identity record, optionally as of a past state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetNym {
    pub dest: Did,
    #[serde(rename = "seqNo", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl GetNym {
    pub fn new(dest: impl Into<Did>) -> Self {
        Self {
            dest: dest.into(),
            seq_no: None,
            timestamp: None,
        }
    }

    pub fn at_seq_no(mut self, seq_no: i32) -> Self {
        self.seq_no = Some(seq_no);
        self
    }

    pub fn at_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
