//! Ed25519 signing and author/endorser multi-signature properties.

#![cfg(feature = "ed25519")]

mod common;

use std::sync::Arc;

use indy_ledger_sdk::prelude::*;
use indy_ledger_sdk::request::{append_endorser_signature, endorsement_input};

use common::{client_with, ScriptedTransport};

const TRUSTEE_SEED: &str = "000000000000000000000000Trustee1";
const AUTHOR_SEED: &str = "00000000000000000000000000000My1";

fn trustee() -> Ed25519Signer {
    Ed25519Signer::from_seed(TRUSTEE_SEED).unwrap()
}

fn author() -> Ed25519Signer {
    Ed25519Signer::from_seed(AUTHOR_SEED).unwrap()
}

fn endorsed_nym(author: &Ed25519Signer, endorser: &Ed25519Signer) -> Request {
    Request::builder(
        Nym::new("FzAaV9Waa1DccDa72qwg13").with_role(Role::Endorser),
        author.did().clone(),
    )
    .endorser(endorser.did().clone())
    .req_id(1_514_215_426)
    .build()
}

#[test]
fn test_known_keys_derive_expected_identities() {
    let author = author();
    assert_eq!(author.did().as_str(), "VsKV7grR1BUE29mG2Fm2kX");
    assert_eq!(author.verkey(), "GjZWsBLgZCR18aL468JAT7w9CZRiBnpxUPPgyQxh4voa");
    assert_eq!(author.abbreviated_verkey(), "~HYwqs2vrTc8Tn4uBV7NBTe");
}

#[test]
fn test_nym_signature_is_reproducible() {
    let trustee = trustee();
    let request = Request::builder(
        Nym::new("FzAaV9Waa1DccDa72qwg13").with_role(Role::Endorser),
        trustee.did().clone(),
    )
    .req_id(1_514_215_425)
    .build();

    assert_eq!(
        String::from_utf8(canonicalize(&request).unwrap()).unwrap(),
        r#"{"identifier":"V4SGRU86Z58d6TV7PBUe6f","operation":{"dest":"FzAaV9Waa1DccDa72qwg13","role":"101","type":"1"},"protocolVersion":2,"reqId":1514215425}"#
    );

    let signed = sign_request(request, &trustee, SigningFormat::CanonicalJson).unwrap();
    assert_eq!(
        signed.request().signature(),
        Some("3wRE72SVioZx8ZEtYLmrjUi6ByqzWbhgXKookuH4u3aGFjBt5WS5M2ztXzUqRBFPE58Ee5enC8X4JMMNw4nqB2Le")
    );
}

#[test]
fn test_author_signature_covers_pre_endorsement_bytes() {
    let (author, trustee) = (author(), trustee());
    let unsigned = endorsed_nym(&author, &trustee);
    let message = canonicalize(&unsigned).unwrap();

    let signed = sign_endorsed(unsigned, &author, &trustee, SigningFormat::CanonicalJson).unwrap();
    let signatures = signed.request().signatures().unwrap();
    let author_sig = &signatures[author.did()];

    assert!(verify_signature(&author.verkey(), None, &message, author_sig).unwrap());
    assert!(verify_signature(&author.abbreviated_verkey(), Some(author.did()), &message, author_sig).unwrap());
}

#[test]
fn test_endorser_signature_covers_author_signature() {
    let (author, trustee) = (author(), trustee());
    let partial = sign_as_author(endorsed_nym(&author, &trustee), &author, SigningFormat::CanonicalJson).unwrap();
    let with_author = endorsement_input(partial.request(), SigningFormat::CanonicalJson).unwrap();
    assert!(String::from_utf8(with_author.clone()).unwrap().contains("\"signatures\""));

    let signed = partial.endorse(&trustee, SigningFormat::CanonicalJson).unwrap();
    let endorser_sig = &signed.request().signatures().unwrap()[trustee.did()];
    assert!(verify_signature(&trustee.verkey(), None, &with_author, endorser_sig).unwrap());

    // Not valid over the bytes without the author's signature.
    let without_author = canonicalize(signed.request()).unwrap();
    assert!(!verify_signature(&trustee.verkey(), None, &without_author, endorser_sig).unwrap());
}

#[test]
fn test_endorser_first_is_refused() {
    let (author, trustee) = (author(), trustee());
    let err = append_endorser_signature(endorsed_nym(&author, &trustee), &trustee, SigningFormat::CanonicalJson)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Signing(SigningError::AuthorSignatureMissing(_))));
}

#[test]
fn test_indy_normalized_signatures_verify() {
    let trustee = trustee();
    let request = Request::builder(Nym::new("FzAaV9Waa1DccDa72qwg13"), trustee.did().clone())
        .req_id(4)
        .build();
    let message = indy_ledger_sdk::request::signing_input(&request, SigningFormat::IndyNormalized).unwrap();
    let signed = sign_request(request, &trustee, SigningFormat::IndyNormalized).unwrap();
    assert!(verify_signature(&trustee.verkey(), None, &message, signed.request().signature().unwrap()).unwrap());
}

#[tokio::test]
async fn test_endorsed_nym_through_client() {
    let transport = Arc::new(ScriptedTransport::echo());
    let client = client_with(transport.clone());
    let (author, trustee) = (author(), trustee());
    let author_signer: &dyn Signer = &author;
    let trustee_signer: &dyn Signer = &trustee;

    let reply = client
        .nyms()
        .create_endorsed(
            Nym::new("FzAaV9Waa1DccDa72qwg13").with_verkey("~HmUWn928bnFT6Ephf65YXv"),
            (author.did(), author_signer),
            (trustee.did(), trustee_signer),
        )
        .await
        .unwrap();
    assert_eq!(reply.txn_data().unwrap()["dest"], "FzAaV9Waa1DccDa72qwg13");

    let sent = &transport.submitted()[0];
    assert_eq!(sent["endorser"], trustee.did().as_str());
    assert!(sent.get("signature").is_none());
    let signatures = sent["signatures"].as_object().unwrap();
    assert_eq!(signatures.len(), 2);
    assert!(signatures.contains_key(author.did().as_str()));
    assert!(signatures.contains_key(trustee.did().as_str()));
}
