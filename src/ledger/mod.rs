//! Operation catalog: type-code table and the closed `Operation` enum.

pub mod constants;
pub mod operation;

pub use constants::{AuthAction, LedgerType, Role, TxnType};
pub use operation::{CustomOperation, Operation};
