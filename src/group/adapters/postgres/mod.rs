//! `PostgreSQL` adapters for membership persistence.

mod models;
mod schema;
mod store;

pub use store::{MembershipPgPool, PostgresMembershipStore};
