//! Reply parsing and error classification.
//!
//! Turns the transport's raw JSON string into a [`ReadReply`], a
//! [`WriteReply`], or a classified [`LedgerError`]. A REJECT/REQNACK never
//! yields a partially populated reply.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LedgerError, LedgerRejection, RejectionKind};
use crate::shared::serde_util::{decode_embedded_json, timestamp_secs};

const OP_REPLY: &str = "REPLY";
const OP_REJECT: &str = "REJECT";
const OP_REQNACK: &str = "REQNACK";

// ─── Read ────────────────────────────────────────────────────────────────────

/// Decoded ledger read response.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReply {
    pub txn_type: Option<String>,
    pub identifier: Option<String>,
    pub req_id: Option<u64>,
    pub dest: Option<String>,
    /// Kind-specific payload; JSON carried in a string is decoded.
    pub data: Option<Value>,
    pub seq_no: Option<u64>,
    pub txn_time: Option<u64>,
    /// Opaque, not verified here.
    pub state_proof: Option<Value>,
    /// The full `result` object, for fields not lifted above.
    pub result: Map<String, Value>,
}

impl ReadReply {
    /// `true` when the ledger found nothing (`data` was null).
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Decodes `data` into a typed struct, e.g. [`NymData`](crate::domain::nym::NymData).
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, LedgerError> {
        match &self.data {
            None => Ok(None),
            Some(data) => serde_json::from_value(data.clone())
                .map(Some)
                .map_err(|e| LedgerError::Protocol(format!("Unexpected read data shape: {}", e))),
        }
    }

    pub fn txn_time_utc(&self) -> Option<DateTime<Utc>> {
        self.txn_time.and_then(|t| timestamp_secs::to_datetime(t as i64))
    }
}

// ─── Write ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
    pub seq_no: u64,
    #[serde(default)]
    pub txn_time: u64,
}

impl TxnMetadata {
    pub fn txn_time_utc(&self) -> Option<DateTime<Utc>> {
        timestamp_secs::to_datetime(self.txn_time as i64)
    }
}

/// Decoded ledger write acknowledgement.
///
/// `req_signature`, `root_hash` and `audit_path` form the consensus proof
/// envelope and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    /// Echoed transaction, including the operation as written.
    #[serde(default)]
    pub txn: Value,
    pub txn_metadata: TxnMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_signature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_path: Vec<String>,
}

impl WriteReply {
    pub fn seq_no(&self) -> u64 {
        self.txn_metadata.seq_no
    }

    pub fn txn_id(&self) -> Option<&str> {
        self.txn_metadata.txn_id.as_deref()
    }

    /// `txn.data`, the operation fields as the ledger recorded them.
    pub fn txn_data(&self) -> Option<&Value> {
        self.txn.get("data")
    }
}

/// Either reply, for operations whose class is only known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Read(ReadReply),
    Write(WriteReply),
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Splits a raw response into its `result` object or a classified error.
fn classify(raw: &str) -> Result<Map<String, Value>, LedgerError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| LedgerError::Protocol(format!("Malformed reply JSON: {}", e)))?;
    let Value::Object(mut envelope) = value else {
        return Err(LedgerError::Protocol("Reply is not a JSON object".to_string()));
    };

    let op = envelope.get("op").and_then(Value::as_str).map(str::to_string);
    let has_result = envelope.contains_key("result");

    let rejection_kind = match op.as_deref() {
        Some(OP_REJECT) => Some(RejectionKind::Reject),
        Some(OP_REQNACK) => Some(RejectionKind::Nack),
        None if envelope.contains_key("reason") && !has_result => Some(RejectionKind::Reject),
        _ => None,
    };
    if let Some(kind) = rejection_kind {
        let rejection = LedgerRejection {
            kind,
            reason: envelope
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            req_id: envelope.get("reqId").and_then(Value::as_u64),
            txn_type: None,
        };
        return Err(LedgerError::Rejected(rejection));
    }

    if let Some(op) = op.as_deref() {
        if op != OP_REPLY {
            return Err(LedgerError::Protocol(format!("Unexpected reply op: {}", op)));
        }
    }

    match envelope.remove("result") {
        Some(Value::Object(result)) => Ok(result),
        Some(_) => Err(LedgerError::Protocol("Reply result is not an object".to_string())),
        None => Err(LedgerError::Protocol("Reply has no result".to_string())),
    }
}

pub fn parse_read_reply(raw: &str) -> Result<ReadReply, LedgerError> {
    let result = classify(raw)?;
    let text = |key: &str| result.get(key).and_then(Value::as_str).map(str::to_string);
    let number = |key: &str| result.get(key).and_then(Value::as_u64);

    Ok(ReadReply {
        txn_type: text("type"),
        identifier: text("identifier"),
        req_id: number("reqId"),
        dest: text("dest"),
        data: result.get("data").cloned().and_then(decode_embedded_json),
        seq_no: number("seqNo"),
        txn_time: number("txnTime"),
        state_proof: result.get("state_proof").cloned(),
        result,
    })
}

pub fn parse_write_reply(raw: &str) -> Result<WriteReply, LedgerError> {
    let result = classify(raw)?;
    if result
        .get("txnMetadata")
        .and_then(|meta| meta.get("seqNo"))
        .is_none()
    {
        return Err(LedgerError::Protocol(
            "Write reply is missing txnMetadata.seqNo".to_string(),
        ));
    }
    serde_json::from_value(Value::Object(result))
        .map_err(|e| LedgerError::Protocol(format!("Unexpected write reply shape: {}", e)))
}
