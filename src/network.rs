//! Network and protocol constants.

/// Default indy-vdr-proxy base URL.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3030";

/// Submitter DID used for unsigned reads when no DID is configured.
pub const DEFAULT_REQUEST_DID: &str = "LibindyDid111111111111";

/// Request envelope protocol version. Fixed by the ledger.
pub const PROTOCOL_VERSION: u32 = 2;
