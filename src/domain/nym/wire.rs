//! Decoded `data` of a GET_NYM reply.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NymData {
    pub dest: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub verkey: Option<String>,
    #[serde(rename = "seqNo", default)]
    pub seq_no: Option<u64>,
    #[serde(rename = "txnTime", default)]
    pub txn_time: Option<u64>,
    #[serde(rename = "diddocContent", default)]
    pub diddoc_content: Option<String>,
}

impl NymData {
    pub fn role(&self) -> Option<crate::ledger::Role> {
        self.role.as_deref().and_then(crate::ledger::Role::from_code)
    }
}
