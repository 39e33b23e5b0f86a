//! Auth rules sub-client.

use crate::client::LedgerClient;
use crate::domain::auth_rule::{AuthRule, GetAuthRule};
use crate::error::LedgerError;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct AuthRules<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> AuthRules<'a> {
    pub async fn get_all(&self) -> Result<ReadReply, LedgerError> {
        self.get_for(GetAuthRule::all()).await
    }

    pub async fn get_for(&self, filter: GetAuthRule) -> Result<ReadReply, LedgerError> {
        let request = self.client.request(filter).build();
        self.client.submit_read(request).await
    }

    /// Usually requires a trustee `signer`.
    pub async fn set(
        &self,
        rule: AuthRule,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(rule, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }
}
