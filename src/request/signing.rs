//! Attaching signatures: single signer, or author then endorser.
//!
//! Ordering is enforced twice. At the type level only a [`PartiallySigned`]
//! request can be endorsed. At runtime [`append_endorser_signature`] checks
//! that the author's entry exists before the endorser signs.

use std::collections::BTreeMap;

use crate::error::{BuildError, LedgerError, SigningError};
use crate::request::canonical::{endorsement_input, signing_input, SigningFormat};
use crate::request::Request;
use crate::signer::Signer;

/// A request carrying exactly one of `signature` / `signatures`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest(Request);

impl SignedRequest {
    pub fn request(&self) -> &Request {
        &self.0
    }

    pub fn into_request(self) -> Request {
        self.0
    }

    pub fn req_id(&self) -> u32 {
        self.0.req_id()
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(self.0.to_json()?)
    }
}

/// An author-signed request waiting for its endorser.
#[derive(Debug, Clone, PartialEq)]
pub struct PartiallySigned(Request);

impl PartiallySigned {
    pub fn request(&self) -> &Request {
        &self.0
    }

    /// JSON to hand to the endorser out of band.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(self.0.to_json()?)
    }

    /// Endorser signs the request with the author signature attached.
    pub fn endorse(
        self,
        endorser: &dyn Signer,
        format: SigningFormat,
    ) -> Result<SignedRequest, LedgerError> {
        append_endorser_signature(self.0, endorser, format)
    }
}

fn ensure_writable(request: &Request) -> Result<(), BuildError> {
    if request.is_read() {
        return Err(BuildError::ReadRequestNotSignable(
            request.operation().type_code().to_string(),
        ));
    }
    Ok(())
}

fn ensure_distinct_endorser(request: &Request) -> Result<(), BuildError> {
    if request.endorser() == Some(request.identifier()) {
        return Err(BuildError::InvalidField {
            field: "endorser",
            reason: format!("endorser {} must differ from the author", request.identifier()),
        });
    }
    Ok(())
}

fn sign_bytes(signer: &dyn Signer, message: &[u8]) -> Result<String, SigningError> {
    let signature = signer.sign(message)?;
    Ok(bs58::encode(signature).into_string())
}

/// Single-signer flow: the submitter signs, result goes in `signature`.
pub fn sign_request(
    request: Request,
    signer: &dyn Signer,
    format: SigningFormat,
) -> Result<SignedRequest, LedgerError> {
    ensure_writable(&request)?;
    if request.is_signed() {
        return Err(BuildError::InvalidField {
            field: "signature",
            reason: "request is already signed".to_string(),
        }
        .into());
    }
    if request.needs_endorsement() {
        return Err(BuildError::InvalidField {
            field: "endorser",
            reason: "endorsed requests are signed with sign_as_author then endorse".to_string(),
        }
        .into());
    }

    let message = signing_input(&request, format)?;
    let mut request = request;
    request.signature = Some(sign_bytes(signer, &message)?);
    tracing::debug!(
        req_id = request.req_id(),
        txn_type = request.operation().type_code(),
        "Signed request"
    );
    Ok(SignedRequest(request))
}

/// First half of endorsement: the author signs into `signatures[identifier]`.
pub fn sign_as_author(
    request: Request,
    author: &dyn Signer,
    format: SigningFormat,
) -> Result<PartiallySigned, LedgerError> {
    ensure_writable(&request)?;
    if request.endorser().is_none() {
        return Err(BuildError::MissingField("endorser").into());
    }
    ensure_distinct_endorser(&request)?;

    let message = signing_input(&request, format)?;
    let signature = sign_bytes(author, &message)?;

    let mut request = request;
    request.signature = None;
    let mut signatures = BTreeMap::new();
    signatures.insert(request.identifier().clone(), signature);
    request.signatures = Some(signatures);
    tracing::debug!(req_id = request.req_id(), "Author signed request for endorsement");
    Ok(PartiallySigned(request))
}

/// Second half of endorsement. Fails unless the author's signature is
/// already in `signatures`.
pub fn append_endorser_signature(
    request: Request,
    endorser: &dyn Signer,
    format: SigningFormat,
) -> Result<SignedRequest, LedgerError> {
    ensure_writable(&request)?;
    let endorser_did = request
        .endorser()
        .cloned()
        .ok_or(BuildError::MissingField("endorser"))?;
    ensure_distinct_endorser(&request)?;

    let author_signed = request
        .signatures()
        .map(|sigs| sigs.contains_key(request.identifier()))
        .unwrap_or(false);
    if !author_signed {
        return Err(SigningError::AuthorSignatureMissing(request.identifier().to_string()).into());
    }

    let message = endorsement_input(&request, format)?;
    let signature = sign_bytes(endorser, &message)?;

    let mut request = request;
    if let Some(signatures) = request.signatures.as_mut() {
        signatures.insert(endorser_did, signature);
    }
    tracing::debug!(req_id = request.req_id(), "Endorser signed request");
    Ok(SignedRequest(request))
}

/// Author then endorser, in one call.
pub fn sign_endorsed(
    request: Request,
    author: &dyn Signer,
    endorser: &dyn Signer,
    format: SigningFormat,
) -> Result<SignedRequest, LedgerError> {
    sign_as_author(request, author, format)?.endorse(endorser, format)
}
