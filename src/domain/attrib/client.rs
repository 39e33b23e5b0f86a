//! Attribs sub-client.

use serde_json::Value;

use crate::client::LedgerClient;
use crate::domain::attrib::{endpoint_from_data, Attrib, GetAttrib};
use crate::error::LedgerError;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct Attribs<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Attribs<'a> {
    /// Raw attribute `name` of `dest`, decoded.
    pub async fn get(&self, dest: impl Into<Did>, name: &str) -> Result<Option<Value>, LedgerError> {
        Ok(self.query(GetAttrib::raw(dest, name)).await?.data)
    }

    pub async fn query(&self, get: GetAttrib) -> Result<ReadReply, LedgerError> {
        let request = self.client.request(get).build();
        self.client.submit_read(request).await
    }

    pub async fn get_endpoint(&self, dest: impl Into<Did>) -> Result<Option<String>, LedgerError> {
        let reply = self.query(GetAttrib::endpoint(dest)).await?;
        Ok(reply
            .data
            .as_ref()
            .and_then(endpoint_from_data)
            .map(str::to_string))
    }

    pub async fn set(
        &self,
        attrib: Attrib,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(attrib, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }

    pub async fn set_endpoint(
        &self,
        dest: impl Into<Did>,
        url: &str,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        self.set(Attrib::endpoint(dest, url), submitter, signer).await
    }
}
