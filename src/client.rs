//! High-level client: `LedgerClient` with nested sub-client accessors.
//!
//! The client owns the pool handle and one correlation map per kind of
//! transport call. Each domain has its sub-client in
//! `domain/<name>/client.rs`; this module keeps the builder, the submission
//! pipeline and the accessors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_lock::RwLock;
use serde_json::Value;

use crate::domain::attrib::client::Attribs;
use crate::domain::auth_rule::client::AuthRules;
use crate::domain::handle::client::Handles;
use crate::domain::nym::client::Nyms;
use crate::domain::rich_schema::client::{Contexts, RichSchemas};
use crate::domain::schema::client::Schemas;
use crate::domain::txn::client::Txns;
use crate::error::{BuildError, LedgerError, TransportError};
use crate::ledger::Operation;
use crate::network::DEFAULT_REQUEST_DID;
use crate::pool::correlation::Correlator;
use crate::pool::{CallbackId, GenesisTransactions, PoolHandle, PoolStatus, PoolTransport};
use crate::reply::{parse_read_reply, parse_write_reply, ReadReply, Reply, WriteReply};
use crate::request::{sign_endorsed, sign_request, Request, RequestBuilder, SignedRequest, SigningFormat};
use crate::shared::Did;
use crate::signer::Signer;

// Re-export sub-client types for convenience.
pub use crate::domain::attrib::client::Attribs as AttribsClient;
pub use crate::domain::auth_rule::client::AuthRules as AuthRulesClient;
pub use crate::domain::handle::client::Handles as HandlesClient;
pub use crate::domain::nym::client::Nyms as NymsClient;
pub use crate::domain::rich_schema::client::Contexts as ContextsClient;
pub use crate::domain::rich_schema::client::RichSchemas as RichSchemasClient;
pub use crate::domain::schema::client::Schemas as SchemasClient;
pub use crate::domain::txn::client::Txns as TxnsClient;

struct PoolState {
    handle: PoolHandle,
    closed: bool,
}

/// The primary entry point for talking to a ledger.
///
/// Provides nested sub-client accessors for each domain:
/// `client.nyms()`, `client.schemas()`, etc. Submissions are correlated by
/// `reqId`, so any number of them may be in flight at once.
pub struct LedgerClient {
    transport: Arc<dyn PoolTransport>,
    pool: Arc<RwLock<PoolState>>,
    genesis: GenesisTransactions,
    submitter: Did,
    signing_format: SigningFormat,
    reads: Arc<Correlator<String>>,
    writes: Arc<Correlator<String>>,
    refreshes: Arc<Correlator<()>>,
    statuses: Arc<Correlator<String>>,
    next_callback: Arc<AtomicU64>,
}

impl LedgerClient {
    pub fn builder() -> LedgerClientBuilder {
        LedgerClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn nyms(&self) -> Nyms<'_> {
        Nyms { client: self }
    }

    pub fn attribs(&self) -> Attribs<'_> {
        Attribs { client: self }
    }

    pub fn schemas(&self) -> Schemas<'_> {
        Schemas { client: self }
    }

    pub fn rich_schemas(&self) -> RichSchemas<'_> {
        RichSchemas { client: self }
    }

    pub fn contexts(&self) -> Contexts<'_> {
        Contexts { client: self }
    }

    pub fn auth_rules(&self) -> AuthRules<'_> {
        AuthRules { client: self }
    }

    pub fn handles(&self) -> Handles<'_> {
        Handles { client: self }
    }

    pub fn txns(&self) -> Txns<'_> {
        Txns { client: self }
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn genesis(&self) -> &GenesisTransactions {
        &self.genesis
    }

    /// Submitter DID used for reads when none is given.
    pub fn submitter(&self) -> &Did {
        &self.submitter
    }

    pub fn signing_format(&self) -> SigningFormat {
        self.signing_format
    }

    /// Starts a request from the default submitter.
    pub fn request(&self, operation: impl Into<Operation>) -> RequestBuilder {
        Request::builder(operation, self.submitter.clone())
    }

    // ── Submission pipeline ──────────────────────────────────────────────

    /// Submits an unsigned read request.
    pub async fn submit_read(&self, request: Request) -> Result<ReadReply, LedgerError> {
        if !request.is_read() {
            return Err(BuildError::NotAReadOperation(request.operation().type_code().to_string()).into());
        }
        let (req_id, txn_type) = context_of(&request);
        let raw = self.dispatch(&request, &self.reads).await?;
        parse_read_reply(&raw).map_err(|e| failed(e, req_id, &txn_type))
    }

    /// Signs `request` with `signer` and submits it.
    pub async fn submit_write(
        &self,
        request: Request,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        if request.is_read() {
            return Err(BuildError::NotAWriteOperation(request.operation().type_code().to_string()).into());
        }
        let (req_id, txn_type) = context_of(&request);
        let signed = sign_request(request, signer, self.signing_format)
            .map_err(|e| failed(e, req_id, &txn_type))?;
        self.submit_signed(signed).await
    }

    /// Author signs, then endorser signs, then submit.
    pub async fn submit_endorsed(
        &self,
        request: Request,
        author: &dyn Signer,
        endorser: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        if request.is_read() {
            return Err(BuildError::NotAWriteOperation(request.operation().type_code().to_string()).into());
        }
        let (req_id, txn_type) = context_of(&request);
        let signed = sign_endorsed(request, author, endorser, self.signing_format)
            .map_err(|e| failed(e, req_id, &txn_type))?;
        self.submit_signed(signed).await
    }

    /// Submits a request whose signatures were attached elsewhere.
    pub async fn submit_signed(&self, signed: SignedRequest) -> Result<WriteReply, LedgerError> {
        let request = signed.into_request();
        let (req_id, txn_type) = context_of(&request);
        let raw = self.dispatch(&request, &self.writes).await?;
        parse_write_reply(&raw).map_err(|e| failed(e, req_id, &txn_type))
    }

    /// Submits an arbitrary operation object, routed by its type code.
    ///
    /// Writes need `writer`, the submitting DID and its signer.
    pub async fn submit_custom(
        &self,
        operation: Value,
        writer: Option<(&Did, &dyn Signer)>,
    ) -> Result<Reply, LedgerError> {
        let operation = Operation::custom(operation)?;
        if operation.is_read() {
            let request = self.request(operation).build();
            return self.submit_read(request).await.map(Reply::Read);
        }
        let (submitter, signer) = writer.ok_or(BuildError::MissingField("signer"))?;
        let request = Request::builder(operation, submitter.clone()).build();
        self.submit_write(request, signer).await.map(Reply::Write)
    }

    async fn dispatch(
        &self,
        request: &Request,
        correlator: &Arc<Correlator<String>>,
    ) -> Result<String, LedgerError> {
        let (req_id, txn_type) = context_of(request);
        let pool = self.open_pool().await.map_err(|e| failed(e, req_id, &txn_type))?;
        let bytes = request.to_bytes().map_err(|e| failed(e, req_id, &txn_type))?;

        let pending = correlator
            .register(CallbackId::from(req_id))
            .map_err(|e| failed(e, req_id, &txn_type))?;
        self.transport
            .submit(pool, bytes, pending.id(), correlator.completion())
            .map_err(|e| failed(e, req_id, &txn_type))?;
        tracing::debug!(req_id, txn_type = %txn_type, %pool, "Submitted request");

        let raw = pending.wait().await.map_err(|e| failed(e, req_id, &txn_type))?;
        tracing::debug!(req_id, txn_type = %txn_type, "Received reply");
        Ok(raw)
    }

    // ── Pool ─────────────────────────────────────────────────────────────

    async fn open_pool(&self) -> Result<PoolHandle, TransportError> {
        let state = self.pool.read().await;
        if state.closed {
            return Err(TransportError::PoolNotOpen(state.handle));
        }
        Ok(state.handle)
    }

    fn callback_id(&self) -> CallbackId {
        self.next_callback.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn pool_status(&self) -> Result<PoolStatus, LedgerError> {
        let pool = self.open_pool().await?;
        let pending = self.statuses.register(self.callback_id())?;
        self.transport
            .status(pool, pending.id(), self.statuses.completion())?;
        let raw = pending.wait().await?;
        serde_json::from_str(&raw)
            .map_err(|e| LedgerError::Protocol(format!("Unexpected pool status: {}", e)))
    }

    /// Asks the transport to re-sync pool membership.
    pub async fn refresh_pool(&self) -> Result<(), LedgerError> {
        let pool = self.open_pool().await?;
        let pending = self.refreshes.register(self.callback_id())?;
        self.transport
            .refresh(pool, pending.id(), self.refreshes.completion())?;
        pending.wait().await?;
        tracing::info!(%pool, "Refreshed pool");
        Ok(())
    }

    /// Closes the pool. Every later call fails with `PoolNotOpen`.
    pub async fn close(&self) -> Result<(), LedgerError> {
        let mut state = self.pool.write().await;
        if state.closed {
            return Err(TransportError::PoolNotOpen(state.handle).into());
        }
        self.transport.close(state.handle)?;
        state.closed = true;
        tracing::info!(pool = %state.handle, "Closed pool");
        Ok(())
    }
}

impl Clone for LedgerClient {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            pool: self.pool.clone(),
            genesis: self.genesis.clone(),
            submitter: self.submitter.clone(),
            signing_format: self.signing_format,
            reads: self.reads.clone(),
            writes: self.writes.clone(),
            refreshes: self.refreshes.clone(),
            statuses: self.statuses.clone(),
            next_callback: self.next_callback.clone(),
        }
    }
}

fn context_of(request: &Request) -> (u32, String) {
    (request.req_id(), request.operation().type_code().to_string())
}

/// Attaches operation context to a pipeline failure and logs it.
fn failed(err: impl Into<LedgerError>, req_id: u32, txn_type: &str) -> LedgerError {
    match err.into() {
        LedgerError::Rejected(mut rejection) => {
            rejection.txn_type = Some(txn_type.to_string());
            rejection.req_id.get_or_insert(u64::from(req_id));
            tracing::warn!(
                req_id,
                txn_type,
                kind = ?rejection.kind,
                reason = %rejection.reason,
                "Ledger rejected request"
            );
            LedgerError::Rejected(rejection)
        }
        other => {
            tracing::debug!(req_id, txn_type, error = %other, "Request failed");
            other
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct LedgerClientBuilder {
    transport: Option<Arc<dyn PoolTransport>>,
    genesis: Option<GenesisTransactions>,
    submitter: Did,
    signing_format: SigningFormat,
}

impl Default for LedgerClientBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            genesis: None,
            submitter: Did::new(DEFAULT_REQUEST_DID),
            signing_format: SigningFormat::default(),
        }
    }
}

impl LedgerClientBuilder {
    pub fn transport(mut self, transport: impl PoolTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Shares a transport with other owners.
    pub fn shared_transport(mut self, transport: Arc<dyn PoolTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn genesis(mut self, genesis: impl Into<GenesisTransactions>) -> Self {
        self.genesis = Some(genesis.into());
        self
    }

    pub fn default_submitter(mut self, did: impl Into<Did>) -> Self {
        self.submitter = did.into();
        self
    }

    pub fn signing_format(mut self, format: SigningFormat) -> Self {
        self.signing_format = format;
        self
    }

    /// Opens the pool. Without an explicit transport, the `http` feature
    /// falls back to a proxy at [`DEFAULT_PROXY_URL`](crate::network::DEFAULT_PROXY_URL).
    pub fn build(self) -> Result<LedgerClient, LedgerError> {
        let genesis = self.genesis.ok_or(BuildError::MissingField("genesis"))?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };

        let handle = transport.open(&genesis)?;
        tracing::info!(
            pool = %handle,
            transactions = genesis.transaction_count(),
            "Opened pool"
        );

        Ok(LedgerClient {
            transport,
            pool: Arc::new(RwLock::new(PoolState {
                handle,
                closed: false,
            })),
            genesis,
            submitter: self.submitter,
            signing_format: self.signing_format,
            reads: Correlator::new("read"),
            writes: Correlator::new("write"),
            refreshes: Correlator::new("refresh"),
            statuses: Correlator::new("status"),
            next_callback: Arc::new(AtomicU64::new(1)),
        })
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<Arc<dyn PoolTransport>, LedgerError> {
    Ok(Arc::new(crate::pool::proxy::ProxyTransport::builder().build()?))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<Arc<dyn PoolTransport>, LedgerError> {
    Err(BuildError::MissingField("transport").into())
}
