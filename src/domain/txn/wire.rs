//! Decoded `data` of TAA and AML read replies.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxnAuthorAgreement {
    pub text: String,
    pub version: String,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub ratification_ts: Option<u64>,
    #[serde(default)]
    pub retirement_ts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcceptanceMechanisms {
    /// Mechanism label → description.
    pub aml: HashMap<String, String>,
    pub version: String,
    #[serde(rename = "amlContext", default)]
    pub aml_context: Option<String>,
}

impl AcceptanceMechanisms {
    pub fn supports(&self, mechanism: &str) -> bool {
        self.aml.contains_key(mechanism)
    }
}
