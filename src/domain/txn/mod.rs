//! Ledger transaction reads: GET_TXN and the transaction author agreement.

pub mod client;
pub mod wire;

use serde::Serialize;

use crate::ledger::constants::LedgerType;

pub use wire::{AcceptanceMechanisms, TxnAuthorAgreement};

/// Reads one transaction by sequence number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetTxn {
    #[serde(rename = "ledgerId")]
    pub ledger_id: LedgerType,
    /// Sequence number.
    pub data: i32,
}

impl GetTxn {
    pub fn new(ledger: LedgerType, seq_no: i32) -> Self {
        Self {
            ledger_id: ledger,
            data: seq_no,
        }
    }
}

/// Reads the active (or a specific) transaction author agreement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetTxnAuthorAgreement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Reads the accepted TAA acceptance mechanisms (AML).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetAcceptanceMechanisms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
