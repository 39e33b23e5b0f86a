//! Handles sub-client: handle registration and auctions.

use crate::client::LedgerClient;
use crate::domain::handle::{AuctionStart, GetHandle, Handle};
use crate::error::LedgerError;
use crate::reply::{ReadReply, WriteReply};
use crate::request::Request;
use crate::shared::Did;
use crate::signer::Signer;

pub struct Handles<'a> {
    pub(crate) client: &'a LedgerClient,
}

impl<'a> Handles<'a> {
    pub async fn add(
        &self,
        handle: Handle,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let request = Request::builder(handle, submitter.clone()).build();
        self.client.submit_write(request, signer).await
    }

    pub async fn get(&self, dest: impl Into<Did>, handle: &str) -> Result<ReadReply, LedgerError> {
        let request = self.client.request(GetHandle::new(dest, handle)).build();
        self.client.submit_read(request).await
    }

    /// The auctioned handle is also set on the request envelope.
    pub async fn start_auction(
        &self,
        auction: AuctionStart,
        submitter: &Did,
        signer: &dyn Signer,
    ) -> Result<WriteReply, LedgerError> {
        let handle = auction.handle.clone();
        let request = Request::builder(auction, submitter.clone())
            .handle(handle)
            .build();
        self.client.submit_write(request, signer).await
    }
}
