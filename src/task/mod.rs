//! Group task tracking for Studyhall.
//!
//! Tasks are ordinary validated records with one cross-module constraint:
//! an assignee must hold a membership of the owning group. The task board
//! service enforces that constraint transactionally; the membership
//! invariant engine keeps it true across leaves and removals by nulling
//! assignments when a membership is deleted.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]
//!
//! Persistence goes through the group module's store port, which carries
//! the task primitives so membership and task writes share a transaction.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
