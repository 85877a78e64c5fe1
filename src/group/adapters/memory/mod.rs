//! In-memory adapters for membership persistence.

mod store;

pub use store::InMemoryMembershipStore;
