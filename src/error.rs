//! Unified ledger error types.

use thiserror::Error;

use crate::pool::{CallbackId, PoolHandle};

/// Top-level ledger error.
///
/// One variant per failure class so callers can tell a transport hiccup
/// from a ledger that said no, and both from a reply nobody understood.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Ledger rejected request: {0}")]
    Rejected(#[from] LedgerRejection),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl LedgerError {
    /// `true` when the ledger itself answered REJECT/REQNACK.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&LedgerRejection> {
        match self {
            LedgerError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(SerializationError::Json(err))
    }
}

/// Invalid arguments to an operation constructor or request builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid ledger identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Read request of type {0} cannot be signed")]
    ReadRequestNotSignable(String),

    #[error("Type {0} is a write operation, use a signing submission")]
    NotAReadOperation(String),

    #[error("Type {0} is a read operation, submit it unsigned")]
    NotAWriteOperation(String),
}

/// Canonical or wire encoding failures.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request did not encode to a JSON object")]
    NotAnObject,

    #[error("Attribute field {0} must be a string to be hashed")]
    AttribNotString(String),
}

/// Errors raised by a [`Signer`](crate::signer::Signer) or the endorsement flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Key material unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid verkey: {0}")]
    InvalidVerkey(String),

    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("Signing primitive rejected input: {0}")]
    Rejected(String),

    #[error("Author {0} must sign before the endorser")]
    AuthorSignatureMissing(String),
}

/// Known transport error codes.
pub mod transport_code {
    pub const INPUT: i64 = 4;
    pub const UNAVAILABLE: i64 = 6;
    pub const UNEXPECTED: i64 = 7;
    pub const POOL_NO_CONSENSUS: i64 = 30;
    pub const POOL_REQUEST_FAILED: i64 = 31;
    pub const POOL_TIMEOUT: i64 = 32;
}

/// Failures reported by the pool transport, carrying its raw code/message.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Pool transport error (code {code}): {message}")]
    Pool { code: i64, message: String },

    #[error("Pool handle {0} is not open")]
    PoolNotOpen(PoolHandle),

    #[error("Callback id {0} already has a submission in flight")]
    DuplicateCallback(CallbackId),

    #[error("Transport dropped callback {0} without completing it")]
    Abandoned(CallbackId),

    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Proxy error {status}: {body}")]
    Proxy { status: u16, body: String },

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl TransportError {
    pub fn pool(code: i64, message: impl Into<String>) -> Self {
        TransportError::Pool {
            code,
            message: message.into(),
        }
    }

    /// Raw transport code, if the failure carries one.
    pub fn code(&self) -> Option<i64> {
        match self {
            TransportError::Pool { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// How the ledger turned a request down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Static validation failed (`REQNACK`).
    Nack,
    /// Dynamic validation failed (`REJECT`).
    Reject,
}

/// A REJECT/REQNACK answer from the ledger. A protocol outcome, not a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?} for type {txn_type:?} (reqId {req_id:?}): {reason}")]
pub struct LedgerRejection {
    pub kind: RejectionKind,
    pub reason: String,
    pub req_id: Option<u64>,
    /// Type code of the submitted operation, filled in by the client.
    pub txn_type: Option<String>,
}
