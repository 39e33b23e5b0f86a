//! Request envelope, builder, and transaction author agreement acceptance.
//!
//! A [`Request`] wraps one [`Operation`] with the submitter DID, a random
//! `reqId` and the fixed protocol version. It leaves the builder unsigned;
//! [`signing`] turns it into a [`SignedRequest`].

pub mod canonical;
pub mod signing;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SerializationError;
use crate::ledger::Operation;
use crate::network::PROTOCOL_VERSION;
use crate::shared::Did;

pub use canonical::{canonicalize, endorsement_input, signing_input, SigningFormat};
pub use signing::{
    append_endorser_signature, sign_as_author, sign_endorsed, sign_request, PartiallySigned,
    SignedRequest,
};

const SECONDS_PER_DAY: i64 = 86_400;

// ─── TaaAcceptance ───────────────────────────────────────────────────────────

/// Proof that the author accepted the transaction author agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaaAcceptance {
    pub taa_digest: String,
    pub mechanism: String,
    /// Acceptance time in epoch seconds, truncated to the UTC day.
    pub time: u64,
}

impl TaaAcceptance {
    pub fn new(
        digest: impl Into<String>,
        mechanism: impl Into<String>,
        accepted_at: DateTime<Utc>,
    ) -> Self {
        let secs = accepted_at.timestamp().max(0);
        Self {
            taa_digest: digest.into(),
            mechanism: mechanism.into(),
            time: (secs - secs % SECONDS_PER_DAY) as u64,
        }
    }

    /// Computes the digest from the agreement text and version.
    pub fn from_text(
        text: &str,
        version: &str,
        mechanism: impl Into<String>,
        accepted_at: DateTime<Utc>,
    ) -> Self {
        Self::new(taa_digest(text, version), mechanism, accepted_at)
    }
}

/// `hex(sha256(version || text))`
pub fn taa_digest(text: &str, version: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.as_bytes());
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A ledger request envelope.
///
/// Fields are read-only; signatures are attached only through the
/// functions in [`signing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    operation: Operation,
    identifier: Did,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endorser: Option<Did>,
    req_id: u32,
    protocol_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signatures: Option<BTreeMap<Did, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    taa_acceptance: Option<TaaAcceptance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<String>,
}

impl Request {
    pub fn builder(operation: impl Into<Operation>, submitter: impl Into<Did>) -> RequestBuilder {
        RequestBuilder::new(operation.into(), submitter.into())
    }

    /// Parses a request handed over as JSON, e.g. for endorsement.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn identifier(&self) -> &Did {
        &self.identifier
    }

    pub fn endorser(&self) -> Option<&Did> {
        self.endorser.as_ref()
    }

    pub fn req_id(&self) -> u32 {
        self.req_id
    }

    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn signatures(&self) -> Option<&BTreeMap<Did, String>> {
        self.signatures.as_ref()
    }

    pub fn taa_acceptance(&self) -> Option<&TaaAcceptance> {
        self.taa_acceptance.as_ref()
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub fn is_read(&self) -> bool {
        self.operation.is_read()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some() || self.signatures.is_some()
    }

    /// `true` when the request names an endorser and so needs a
    /// multi-signature before submission.
    pub fn needs_endorsement(&self) -> bool {
        self.endorser.is_some()
    }

    /// Author and endorser for a request that expects a co-signature.
    pub fn endorsement_spec(&self) -> Option<EndorsementSpec<'_>> {
        self.endorser.as_ref().map(|endorser| EndorsementSpec {
            author: &self.identifier,
            endorser,
        })
    }

    /// Wire encoding. Key order is irrelevant here.
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Who signs an endorsed request, in signing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndorsementSpec<'a> {
    pub author: &'a Did,
    pub endorser: &'a Did,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

pub struct RequestBuilder {
    operation: Operation,
    submitter: Did,
    endorser: Option<Did>,
    taa_acceptance: Option<TaaAcceptance>,
    req_id: Option<u32>,
    handle: Option<String>,
}

impl RequestBuilder {
    pub fn new(operation: Operation, submitter: Did) -> Self {
        Self {
            operation,
            submitter,
            endorser: None,
            taa_acceptance: None,
            req_id: None,
            handle: None,
        }
    }

    pub fn endorser(mut self, endorser: impl Into<Did>) -> Self {
        self.endorser = Some(endorser.into());
        self
    }

    pub fn taa_acceptance(mut self, acceptance: TaaAcceptance) -> Self {
        self.taa_acceptance = Some(acceptance);
        self
    }

    /// Fixes the request id instead of drawing a random one.
    pub fn req_id(mut self, req_id: u32) -> Self {
        self.req_id = Some(req_id);
        self
    }

    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Assembles the unsigned request. Endorser and TAA acceptance are
    /// dropped for read operations.
    pub fn build(self) -> Request {
        let is_read = self.operation.is_read();
        if is_read && (self.endorser.is_some() || self.taa_acceptance.is_some()) {
            tracing::debug!(
                txn_type = self.operation.type_code(),
                "Dropping endorser/TAA acceptance from read request"
            );
        }
        let request = Request {
            identifier: self.submitter,
            endorser: if is_read { None } else { self.endorser },
            req_id: self.req_id.unwrap_or_else(rand::random::<u32>),
            protocol_version: PROTOCOL_VERSION,
            signature: None,
            signatures: None,
            taa_acceptance: if is_read { None } else { self.taa_acceptance },
            handle: self.handle,
            operation: self.operation,
        };
        tracing::debug!(
            req_id = request.req_id,
            txn_type = request.operation.type_code(),
            "Built request"
        );
        request
    }
}

/// Composes `op` and envelope metadata into an unsigned request.
pub fn build_request(
    operation: impl Into<Operation>,
    submitter: impl Into<Did>,
    endorser: Option<Did>,
    taa_acceptance: Option<TaaAcceptance>,
) -> Request {
    let mut builder = Request::builder(operation, submitter);
    if let Some(endorser) = endorser {
        builder = builder.endorser(endorser);
    }
    if let Some(acceptance) = taa_acceptance {
        builder = builder.taa_acceptance(acceptance);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nym::{GetNym, Nym};
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_build_get_nym() {
        let request = build_request(
            GetNym::new("FzAaV9Waa1DccDa72qwg13"),
            "LibindyDid111111111111",
            None,
            None,
        );
        assert_eq!(request.operation().type_code(), "105");
        assert_eq!(request.operation().dest().unwrap().as_str(), "FzAaV9Waa1DccDa72qwg13");
        assert_eq!(request.identifier().as_str(), "LibindyDid111111111111");
        assert_eq!(request.protocol_version(), 2);
        assert!(!request.is_signed());
    }

    #[test]
    fn test_read_request_drops_endorser_and_taa() {
        let taa = TaaAcceptance::new("abc", "for_session", Utc::now());
        let request = build_request(
            GetNym::new("FzAaV9Waa1DccDa72qwg13"),
            "LibindyDid111111111111",
            Some(Did::new("EndorserDid1111111111")),
            Some(taa),
        );
        assert_eq!(request.endorser(), None);
        assert_eq!(request.taa_acceptance(), None);
    }

    #[test]
    fn test_write_request_keeps_endorser() {
        let request = Request::builder(Nym::new("V4SGRU86Z58d6TV7PBUe6f"), "Th7MpTaRZVRYnPiabds81Y")
            .endorser("V4SGRU86Z58d6TV7PBUe6f")
            .req_id(7)
            .build();
        assert!(request.needs_endorsement());
        let spec = request.endorsement_spec().unwrap();
        assert_eq!(spec.author.as_str(), "Th7MpTaRZVRYnPiabds81Y");
        assert_eq!(spec.endorser.as_str(), "V4SGRU86Z58d6TV7PBUe6f");
        let wire: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            wire,
            json!({
                "operation": {"type": "1", "dest": "V4SGRU86Z58d6TV7PBUe6f"},
                "identifier": "Th7MpTaRZVRYnPiabds81Y",
                "endorser": "V4SGRU86Z58d6TV7PBUe6f",
                "reqId": 7,
                "protocolVersion": 2
            })
        );
    }

    #[test]
    fn test_taa_time_truncated_to_day() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 17, 42, 11).unwrap();
        let taa = TaaAcceptance::new("abc", "for_session", at);
        let midnight = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(taa.time, midnight.timestamp() as u64);
    }

    #[test]
    fn test_taa_digest_covers_version_then_text() {
        let digest = taa_digest("some agreement text", "1.0");
        let mut hasher = Sha256::new();
        hasher.update(b"1.0some agreement text");
        assert_eq!(digest, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_request_json_round_trip_keeps_operation_bytes() {
        let request = Request::builder(Nym::new("V4SGRU86Z58d6TV7PBUe6f"), "Th7MpTaRZVRYnPiabds81Y")
            .req_id(99)
            .build();
        let parsed = Request::from_json(&request.to_json().unwrap()).unwrap();
        assert_eq!(canonicalize(&parsed).unwrap(), canonicalize(&request).unwrap());
        assert_eq!(parsed.req_id(), 99);
    }
}
