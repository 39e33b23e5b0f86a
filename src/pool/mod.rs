//! Pool transport contract.
//!
//! The transport opens a connection from genesis transactions, broadcasts
//! signed requests to the node pool and reports back through a completion
//! callback. Consensus, node selection and retries all live behind this
//! trait. [`LedgerClient`](crate::client::LedgerClient) turns the callbacks
//! into awaitable results via [`correlation`].

pub mod correlation;
#[cfg(feature = "http")]
pub mod proxy;

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{transport_code, TransportError};
use crate::shared::serde_util::null_as_default;

/// Correlates a transport completion with the call that started it.
/// Submissions use the request's `reqId`.
pub type CallbackId = u64;

/// Invoked exactly once per accepted call, from any thread.
pub type Completion<T> = Arc<dyn Fn(CallbackId, Result<T, TransportError>) + Send + Sync>;

/// Opaque handle to an open pool, issued by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle(pub i64);

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The external node-pool transport.
///
/// `submit`, `refresh` and `status` return as soon as the call is accepted.
/// The result arrives later through the completion, tagged with the
/// `callback_id` passed in. An `Err` from the method itself means the call
/// was never started and the completion will not fire.
pub trait PoolTransport: Send + Sync + 'static {
    fn open(&self, genesis: &GenesisTransactions) -> Result<PoolHandle, TransportError>;

    /// Broadcasts an already signed, wire-encoded request.
    fn submit(
        &self,
        pool: PoolHandle,
        request: Vec<u8>,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError>;

    fn refresh(
        &self,
        pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<()>,
    ) -> Result<(), TransportError>;

    /// Completes with the pool status as a JSON string.
    fn status(
        &self,
        pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError>;

    fn close(&self, pool: PoolHandle) -> Result<(), TransportError>;
}

// ─── Genesis ─────────────────────────────────────────────────────────────────

/// Newline-delimited pool transactions, held verbatim for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisTransactions(String);

impl GenesisTransactions {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, TransportError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| {
            TransportError::pool(
                transport_code::INPUT,
                format!("Unreadable genesis transactions: {}", e),
            )
        })?;
        Ok(Self(text))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            TransportError::pool(
                transport_code::INPUT,
                format!("Cannot open genesis file {}: {}", path.display(), e),
            )
        })?;
        Self::from_reader(file)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of non-empty lines.
    pub fn transaction_count(&self) -> usize {
        self.0.lines().filter(|line| !line.trim().is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count() == 0
    }
}

impl From<&str> for GenesisTransactions {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for GenesisTransactions {
    fn from(text: String) -> Self {
        Self(text)
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Pool snapshot as reported by the transport. Passed through untouched.
///
/// A pool still in `init` reports its root, size and node list as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolStatus {
    #[serde(default, alias = "pool_mt_root")]
    pub mt_root: Option<String>,
    #[serde(default, alias = "pool_mt_size")]
    pub mt_size: Option<u64>,
    #[serde(default, alias = "pool_nodes", deserialize_with = "null_as_default")]
    pub nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Seconds elapsed since the last refresh, not a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<u64>,
}

impl PoolStatus {
    pub fn since_last_refresh(&self) -> Option<std::time::Duration> {
        self.last_refresh.map(std::time::Duration::from_secs)
    }

    /// Wall-clock time of the last refresh, relative to now.
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.last_refresh?).ok()?;
        Utc::now().checked_sub_signed(TimeDelta::try_seconds(secs)?)
    }
}
