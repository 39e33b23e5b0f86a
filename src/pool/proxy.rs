//! `PoolTransport` over an indy-vdr-proxy HTTP gateway.
//!
//! The proxy owns the real node pool. `open` only registers a local handle;
//! each call becomes one HTTP exchange run on a spawned tokio task.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{transport_code, TransportError};
use crate::http::{ProxyHttp, RetryPolicy};
use crate::network::DEFAULT_PROXY_URL;
use crate::pool::{CallbackId, Completion, GenesisTransactions, PoolHandle, PoolTransport};

/// Maps the proxy's answer to a submission onto the transport contract.
///
/// A 400 whose body is a ledger reply (has `op`) is a REJECT/REQNACK and
/// goes to the reply parser as a normal response.
pub fn classify_submit_response(status: u16, body: String) -> Result<String, TransportError> {
    match status {
        200..=299 => Ok(body),
        400 if is_ledger_reply(&body) => Ok(body),
        400 => Err(TransportError::pool(transport_code::POOL_REQUEST_FAILED, body)),
        409 => Err(TransportError::pool(transport_code::POOL_NO_CONSENSUS, body)),
        503 => Err(TransportError::pool(transport_code::UNAVAILABLE, body)),
        504 => Err(TransportError::pool(transport_code::POOL_TIMEOUT, body)),
        _ => Err(TransportError::Proxy { status, body }),
    }
}

fn is_ledger_reply(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .map(|value| value.get("op").is_some())
        .unwrap_or(false)
}

pub struct ProxyTransport {
    http: Arc<ProxyHttp>,
    retry: RetryPolicy,
    next_handle: AtomicI64,
    open_pools: Mutex<HashSet<PoolHandle>>,
}

impl ProxyTransport {
    pub fn builder() -> ProxyTransportBuilder {
        ProxyTransportBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    fn ensure_open(&self, pool: PoolHandle) -> Result<(), TransportError> {
        if self.open_pools.lock().contains(&pool) {
            Ok(())
        } else {
            Err(TransportError::PoolNotOpen(pool))
        }
    }

    /// Runs `call` on the current tokio runtime and hands its result to
    /// `on_complete`.
    fn spawn<T, F>(
        &self,
        callback_id: CallbackId,
        on_complete: Completion<T>,
        call: F,
    ) -> Result<(), TransportError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, TransportError>> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            TransportError::pool(
                transport_code::UNAVAILABLE,
                format!("Proxy transport needs a tokio runtime: {}", e),
            )
        })?;
        runtime.spawn(async move {
            let result = call.await;
            on_complete(callback_id, result);
        });
        Ok(())
    }
}

impl PoolTransport for ProxyTransport {
    fn open(&self, genesis: &GenesisTransactions) -> Result<PoolHandle, TransportError> {
        if genesis.is_empty() {
            return Err(TransportError::pool(
                transport_code::INPUT,
                "Genesis transactions are empty",
            ));
        }
        let pool = PoolHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.open_pools.lock().insert(pool);
        tracing::debug!(%pool, base_url = self.base_url(), "Registered proxy pool handle");
        Ok(pool)
    }

    fn submit(
        &self,
        pool: PoolHandle,
        request: Vec<u8>,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError> {
        self.ensure_open(pool)?;
        let http = Arc::clone(&self.http);
        self.spawn(callback_id, on_complete, async move {
            let response = http.post("submit", request).await?;
            classify_submit_response(response.status, response.body)
        })
    }

    fn refresh(
        &self,
        pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<()>,
    ) -> Result<(), TransportError> {
        self.ensure_open(pool)?;
        let http = Arc::clone(&self.http);
        let retry = self.retry.clone();
        self.spawn(callback_id, on_complete, async move {
            http.get("genesis", &retry).await.map(|_| ())
        })
    }

    fn status(
        &self,
        pool: PoolHandle,
        callback_id: CallbackId,
        on_complete: Completion<String>,
    ) -> Result<(), TransportError> {
        self.ensure_open(pool)?;
        let http = Arc::clone(&self.http);
        let retry = self.retry.clone();
        self.spawn(callback_id, on_complete, async move { http.get("", &retry).await })
    }

    fn close(&self, pool: PoolHandle) -> Result<(), TransportError> {
        if self.open_pools.lock().remove(&pool) {
            Ok(())
        } else {
            Err(TransportError::PoolNotOpen(pool))
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct ProxyTransportBuilder {
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for ProxyTransportBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROXY_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::Idempotent,
        }
    }
}

impl ProxyTransportBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Policy for `status` and `refresh`. Submissions never retry.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<ProxyTransport, TransportError> {
        Ok(ProxyTransport {
            http: Arc::new(ProxyHttp::new(&self.base_url, self.timeout)?),
            retry: self.retry,
            next_handle: AtomicI64::new(1),
            open_pools: Mutex::new(HashSet::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_status_mapping() {
        assert_eq!(classify_submit_response(200, "{}".into()).unwrap(), "{}");
        let reject = r#"{"op":"REJECT","reason":"unauthorized"}"#.to_string();
        assert_eq!(classify_submit_response(400, reject.clone()).unwrap(), reject);

        let code = |status| classify_submit_response(status, "nope".into()).unwrap_err().code();
        assert_eq!(code(400), Some(transport_code::POOL_REQUEST_FAILED));
        assert_eq!(code(409), Some(transport_code::POOL_NO_CONSENSUS));
        assert_eq!(code(503), Some(transport_code::UNAVAILABLE));
        assert_eq!(code(504), Some(transport_code::POOL_TIMEOUT));
        assert!(matches!(
            classify_submit_response(500, "boom".into()),
            Err(TransportError::Proxy { status: 500, .. })
        ));
    }

    #[test]
    fn test_open_requires_genesis_and_close_releases() {
        let transport = ProxyTransport::builder().build().unwrap();
        assert!(transport.open(&GenesisTransactions::new("")).is_err());

        let pool = transport
            .open(&GenesisTransactions::new(r#"{"txn":{"type":"0"}}"#))
            .unwrap();
        transport.close(pool).unwrap();
        assert!(matches!(transport.close(pool), Err(TransportError::PoolNotOpen(_))));
    }

    #[test]
    fn test_submit_on_closed_pool_fails_synchronously() {
        let transport = ProxyTransport::builder().build().unwrap();
        let completion: Completion<String> = Arc::new(|_, _| {});
        let err = transport
            .submit(PoolHandle(42), b"{}".to_vec(), 1, completion)
            .unwrap_err();
        assert!(matches!(err, TransportError::PoolNotOpen(PoolHandle(42))));
    }
}
