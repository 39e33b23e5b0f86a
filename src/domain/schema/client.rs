//! Schemas sub-client: schemas and credential definition lookups.

use crate::client::LedgerClient;
use crate::domain::schema::{GetClaimDef, GetSchema, Schema, SchemaData};
use crate::error::LedgerError;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct Schemas<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Schemas<'a> {
    pub async fn get(
        &self,
        issuer: impl Into<Did>,
        name: &str,
        version: &str,
    ) -> Result<Option<SchemaData>, LedgerError> {
        self.fetch(GetSchema::new(issuer, name, version)).await
    }

    /// Looks up `<issuer>:2:<name>:<version>`.
    pub async fn get_by_id(&self, schema_id: &str) -> Result<Option<SchemaData>, LedgerError> {
        self.fetch(GetSchema::from_schema_id(schema_id)?).await
    }

    async fn fetch(&self, get: GetSchema) -> Result<Option<SchemaData>, LedgerError> {
        let request = self.client.request(get).build();
        let reply = self.client.submit_read(request).await?;
        let schema: Option<SchemaData> = reply.data_as()?;
        // Unknown schemas come back as name/version with no attributes.
        Ok(schema.filter(|s| !s.attr_names.is_empty()))
    }

    pub async fn create(
        &self,
        schema: Schema,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(schema, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }

    /// Reads `<issuer>:3:CL:<schema seqNo>[:<tag>]`.
    pub async fn get_cred_def(&self, cred_def_id: &str) -> Result<ReadReply, LedgerError> {
        let request = self
            .client
            .request(GetClaimDef::from_cred_def_id(cred_def_id)?)
            .build();
        self.client.submit_read(request).await
    }
}
