//! Domain modules organized as vertical slices, one per operation family.
//!
//! Each sub-module contains:
//! - `mod.rs`: Operation payload types and their constructors
//! - `wire.rs`: Serde structs for decoding read reply `data` (where useful)
//! - `client.rs`: Sub-client that builds, signs and submits the operations

pub mod attrib;
pub mod auth_rule;
pub mod handle;
pub mod nym;
pub mod rich_schema;
pub mod schema;
pub mod txn;
