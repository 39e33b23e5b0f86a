//! Rich schema and context sub-clients.

use crate::client::LedgerClient;
use crate::domain::rich_schema::{GetRichObject, RichObject};
use crate::error::LedgerError;
use crate::ledger::Operation;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct RichSchemas<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> RichSchemas<'a> {
    pub async fn get(
        &self,
        dest: impl Into<Did>,
        name: &str,
        version: &str,
    ) -> Result<ReadReply, LedgerError> {
        let get = GetRichObject::new(dest, name, version);
        let request = self.client.request(Operation::GetRichSchema(get)).build();
        self.client.submit_read(request).await
    }

    /// `content` must be a JSON document.
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        version: &str,
        content: &str,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let object = RichObject::schema(id, name, version, content)?;
        let request = Request::builder(object, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }
}

pub struct Contexts<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Contexts<'a> {
    pub async fn get(
        &self,
        dest: impl Into<Did>,
        name: &str,
        version: &str,
    ) -> Result<ReadReply, LedgerError> {
        let get = GetRichObject::new(dest, name, version);
        let request = self.client.request(Operation::GetContext(get)).build();
        self.client.submit_read(request).await
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        version: &str,
        content: &str,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let object = RichObject::context(id, name, version, content)?;
        let request = Request::builder(object, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }
}
