//! HANDLE domain: named handles bound to a DID, and handle auctions.

pub mod client;

use serde::Serialize;

use crate::shared::Did;

/// Registers `handle` for `dest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handle {
    pub dest: Did,
    pub handle: String,
}

impl Handle {
    pub fn new(dest: impl Into<Did>, handle: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            handle: handle.into(),
        }
    }
}

/// Looks up a registered handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetHandle {
    pub dest: Did,
    pub handle: String,
}

impl GetHandle {
    pub fn new(dest: impl Into<Did>, handle: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            handle: handle.into(),
        }
    }
}

/// Opens an auction for a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionStart {
    pub dest: Did,
    #[serde(rename = "auctionid")]
    pub auction_id: String,
    pub handle: String,
}

impl AuctionStart {
    pub fn new(
        dest: impl Into<Did>,
        auction_id: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self {
            dest: dest.into(),
            auction_id: auction_id.into(),
            handle: handle.into(),
        }
    }
}
