//! Nyms sub-client: identity record reads and writes.

use crate::client::LedgerClient;
use crate::domain::nym::{GetNym, Nym, NymData};
use crate::error::LedgerError;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct Nyms<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Nyms<'a> {
    /// Current identity record of `did`, or `None` if the ledger has none.
    pub async fn get(&self, did: impl Into<Did>) -> Result<Option<NymData>, LedgerError> {
        self.query(GetNym::new(did)).await?.data_as()
    }

    /// Full read reply, for historical (`seqNo`/`timestamp`) lookups.
    pub async fn query(&self, get: GetNym) -> Result<ReadReply, LedgerError> {
        let request = self.client.request(get).build();
        self.client.submit_read(request).await
    }

    pub async fn create(
        &self,
        nym: Nym,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(nym, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }

    /// Written by `author`, co-signed by `endorser`.
    pub async fn create_endorsed(
        &self,
        nym: Nym,
        author: (&Did, &dyn Signer),
        endorser: (&Did, &dyn Signer),
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(nym, author.0.clone())
            .endorser(endorser.0.clone())
            .build();
        self.client
            .submit_endorsed(request, author.1, endorser.1)
            .await
    }
}
