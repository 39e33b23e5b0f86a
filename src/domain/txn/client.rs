//! Txns sub-client: transaction reads and the author agreement.

use crate::client::LedgerClient;
use crate::domain::txn::{
    AcceptanceMechanisms, GetAcceptanceMechanisms, GetTxn, GetTxnAuthorAgreement,
    TxnAuthorAgreement,
};
use crate::error::LedgerError;
use crate::ledger::LedgerType;
use crate::reply::ReadReply;

pub struct Txns<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Txns<'a> {
    pub async fn get(&self, ledger: LedgerType, seq_no: i32) -> Result<ReadReply, LedgerError> {
        let request = self.client.request(GetTxn::new(ledger, seq_no)).build();
        self.client.submit_read(request).await
    }

    /// `None` when the ledger has no agreement configured.
    pub async fn author_agreement(
        &self,
        filter: GetTxnAuthorAgreement,
    ) -> Result<Option<TxnAuthorAgreement>, LedgerError> {
        let request = self.client.request(filter).build();
        self.client.submit_read(request).await?.data_as()
    }

    pub async fn acceptance_mechanisms(
        &self,
        filter: GetAcceptanceMechanisms,
    ) -> Result<Option<AcceptanceMechanisms>, LedgerError> {
        let request = self.client.request(filter).build();
        self.client.submit_read(request).await?.data_as()
    }
}
