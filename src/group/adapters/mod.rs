//! Adapter implementations of the group ports.

mod codes;
pub mod memory;
pub mod postgres;

pub use codes::UuidCodeIssuer;
