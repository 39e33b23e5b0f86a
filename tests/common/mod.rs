//! Scripted `PoolTransport` test double.
//!
//! Completions fire on spawned tokio tasks after a per-request delay, so
//! tests can force out-of-order delivery.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};

use indy_ledger_sdk::error::TransportError;
use indy_ledger_sdk::pool::{
    CallbackId, Completion, GenesisTransactions, PoolHandle, PoolTransport,
};
use indy_ledger_sdk::prelude::LedgerClient;

pub const GENESIS: &str = concat!(
    r#"{"reqSignature":{},"txn":{"data":{"data":{"alias":"Node1","client_port":9702,"node_port":9701,"services":["VALIDATOR"]},"dest":"Gw6pDLhcBcoQesN72qfotTgFa7cbuqZpkX3Xo6pLhPhv"},"type":"0"},"txnMetadata":{"seqNo":1}}"#,
    "\n",
    r#"{"reqSignature":{},"txn":{"data":{"data":{"alias":"Node2","client_port":9704,"node_port":9703,"services":["VALIDATOR"]},"dest":"8ECVSk179mjsjKRLWiQtssMLgp6EPhWXtaYyStWPSGAb"},"type":"0"},"txnMetadata":{"seqNo":2}}"#,
    "\n"
);

pub type Responder = Arc<dyn Fn(&Value) -> Result<String, TransportError> + Send + Sync>;
pub type Delay = Arc<dyn Fn(&Value) -> Duration + Send + Sync>;

pub struct ScriptedTransport {
    responder: Responder,
    delay: Delay,
    status: String,
    submitted: Mutex<Vec<Value>>,
    refreshes: AtomicUsize,
    closed: Mutex<Vec<PoolHandle>>,
}

impl ScriptedTransport {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            delay: Arc::new(|_| Duration::ZERO),
            status: json!({"mt_root": "5ecipNPSztrk6X77fYPdepzFRUvLdqBuSqv4M9Mcv2Vn", "mt_size": 2, "nodes": ["Node1", "Node2"]}).to_string(),
            submitted: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
            closed: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with [`echo_reply`].
    pub fn echo() -> Self {
        Self::new(Arc::new(|request| Ok(echo_reply(request))))
    }

    pub fn with_delay(mut self, delay: impl Fn(&Value) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Arc::new(delay);
        self
    }

    pub fn with_status(mut self, status: Value) -> Self {
        self.status = status.to_string();
        self
    }

    /// Requests as they crossed the wire, in submission order.
    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.lock().clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> Vec<PoolHandle> {
        self.closed.lock().clone()
    }

    fn complete_later<T: Send + 'static>(
        delay: Duration,
        callback_id: CallbackId,
        on_complete: Completion<T>,
        result: Result<T, TransportError>,
    ) {
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            on_complete(callback_id, result);
        });
    }
}

impl PoolTransport for ScriptedTransport {
    fn open(&self, genesis: &GenesisTransactions) -> Result<PoolHandle, TransportError> {
        if genesis.is_empty() {
            return Err(TransportError::pool(4, "empty genesis"));
        }
        Ok(PoolHandle(7))
    }

    fn submit(
        &self,
        _pool: PoolHandle,
        request: Vec<u8>,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError> {
        let request: Value = serde_json::from_slice(&request)
            .map_err(|e| TransportError::pool(4, e.to_string()))?;
        self.submitted.lock().push(request.clone());
        let result = (self.responder)(&request);
        Self::complete_later((self.delay)(&request), callback_id, on_complete, result);
        Ok(())
    }

    fn refresh(
        &self,
        _pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<()>,
    ) -> Result<(), TransportError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Self::complete_later(Duration::ZERO, callback_id, on_complete, Ok(()));
        Ok(())
    }

    fn status(
        &self,
        _pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError> {
        Self::complete_later(Duration::ZERO, callback_id, on_complete, Ok(self.status.clone()));
        Ok(())
    }

    fn close(&self, pool: PoolHandle) -> Result<(), TransportError> {
        self.closed.lock().push(pool);
        Ok(())
    }
}

/// A REPLY echoing the request: unsigned reads get a NYM-shaped `data` for
/// the requested `dest`, signed writes get `txnMetadata.seqNo = reqId`.
pub fn echo_reply(request: &Value) -> String {
    let req_id = request["reqId"].as_u64().unwrap_or_default();
    let operation = &request["operation"];
    let txn_type = operation["type"].as_str().unwrap_or_default();
    let is_read = request.get("signature").is_none() && request.get("signatures").is_none();

    let result = if is_read {
        let dest = operation["dest"].clone();
        json!({
            "type": txn_type,
            "identifier": request["identifier"],
            "reqId": req_id,
            "dest": dest,
            "data": json!({"dest": dest, "identifier": "V4SGRU86Z58d6TV7PBUe6f", "role": "101", "verkey": "~CoRER63DVYnWZtK8uAzNbx", "seqNo": 12, "txnTime": 1_700_000_000}).to_string(),
            "seqNo": 12,
            "txnTime": 1_700_000_000,
            "state_proof": {"root_hash": "7Wdj3rrMCZ1R1M78H4xK5jxikmdUUGW2kbfJQ1HoEpK", "multi_signature": {}}
        })
    } else {
        json!({
            "ver": "1",
            "txn": {"type": txn_type, "protocolVersion": 2, "data": operation, "metadata": {"from": request["identifier"], "reqId": req_id}},
            "txnMetadata": {"txnId": format!("txn-{}", req_id), "seqNo": req_id, "txnTime": 1_700_000_000},
            "reqSignature": {"type": "ED25519", "values": []},
            "rootHash": "5ecipNPSztrk6X77fYPdepzFRUvLdqBuSqv4M9Mcv2Vn",
            "auditPath": []
        })
    };
    json!({"op": "REPLY", "result": result}).to_string()
}

pub fn client_with(transport: Arc<ScriptedTransport>) -> LedgerClient {
    LedgerClient::builder()
        .shared_transport(transport)
        .genesis(GENESIS)
        .build()
        .expect("client should open the scripted pool")
}
