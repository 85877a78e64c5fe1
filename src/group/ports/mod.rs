//! Port contracts for group membership management.
//!
//! Ports define infrastructure-agnostic interfaces used by group services.

pub mod codes;
pub mod store;

pub use codes::InviteCodeIssuer;
pub use store::{MembershipStore, StoreError, StoreTx, TxResult};
