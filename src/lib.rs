//! # Indy Ledger SDK
//!
//! Client-side protocol layer for Indy-style ledgers: operation building,
//! canonical signing, endorsement, submission and reply parsing.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: operation catalog, request envelope, canonical serializer,
//!    reply parser (pure transforms, no I/O)
//! 2. **Signing**: the `Signer` capability and the author/endorser flow
//! 3. **Transport**: the `PoolTransport` contract, callback correlation and
//!    an indy-vdr-proxy transport (feature `http`)
//! 4. **High-Level Client**: `LedgerClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use indy_ledger_sdk::prelude::*;
//!
//! let client = LedgerClient::builder()
//!     .genesis(GenesisTransactions::from_file("pool_transactions_genesis")?)
//!     .build()?;
//!
//! let trustee = Ed25519Signer::from_seed("000000000000000000000000Trustee1")?;
//! let nym = client.nyms().get("FzAaV9Waa1DccDa72qwg13").await?;
//! client
//!     .nyms()
//!     .create(Nym::new("FzAaV9Waa1DccDa72qwg13").with_role(Role::Endorser), trustee.did(), &trustee)
//!     .await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and serde helpers.
pub mod shared;

/// Ledger type codes, roles and the closed `Operation` enum.
pub mod ledger;

/// Domain modules (vertical slices): operation payloads, reply data, sub-clients.
pub mod domain;

/// Request envelope, canonical serialization and signature attachment.
pub mod request;

/// Reply parsing and rejection classification.
pub mod reply;

/// Unified ledger error types.
pub mod error;

/// Protocol and endpoint constants.
pub mod network;

// ── Layer 2: Signing ─────────────────────────────────────────────────────────

/// Signing capability and the reference Ed25519 signer.
pub mod signer;

// ── Layer 3: Transport ───────────────────────────────────────────────────────

/// Pool transport contract and completion correlation.
pub mod pool;

/// HTTP client with retry policies, used by the proxy transport.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `LedgerClient`, the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::Did;

    // Catalog
    pub use crate::ledger::{AuthAction, LedgerType, Operation, Role, TxnType};

    // Domain types
    pub use crate::domain::attrib::{Attrib, AttribValue, GetAttrib};
    pub use crate::domain::auth_rule::{AuthRule, Constraint, GetAuthRule};
    pub use crate::domain::handle::{AuctionStart, GetHandle, Handle};
    pub use crate::domain::nym::{GetNym, Nym, NymData};
    pub use crate::domain::rich_schema::{GetRichObject, RichObject};
    pub use crate::domain::schema::{GetClaimDef, GetSchema, Schema, SchemaData};
    pub use crate::domain::txn::{
        AcceptanceMechanisms, GetAcceptanceMechanisms, GetTxn, GetTxnAuthorAgreement,
        TxnAuthorAgreement,
    };

    // Requests + signing
    pub use crate::request::{
        canonicalize, sign_as_author, sign_endorsed, sign_request, PartiallySigned, Request,
        RequestBuilder, SignedRequest, SigningFormat, TaaAcceptance,
    };
    pub use crate::signer::Signer;
    #[cfg(feature = "ed25519")]
    pub use crate::signer::ed25519::{verify_signature, Ed25519Signer};

    // Replies
    pub use crate::reply::{ReadReply, Reply, TxnMetadata, WriteReply};

    // Errors
    pub use crate::error::{
        BuildError, LedgerError, LedgerRejection, RejectionKind, SigningError, TransportError,
    };

    // Network
    pub use crate::network::{DEFAULT_PROXY_URL, DEFAULT_REQUEST_DID, PROTOCOL_VERSION};

    // Transport
    pub use crate::pool::{GenesisTransactions, PoolHandle, PoolStatus, PoolTransport};
    #[cfg(feature = "http")]
    pub use crate::pool::proxy::ProxyTransport;
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Client + sub-clients
    pub use crate::client::{
        AttribsClient, AuthRulesClient, ContextsClient, HandlesClient, LedgerClient,
        LedgerClientBuilder, NymsClient, RichSchemasClient, SchemasClient, TxnsClient,
    };
}
