//! Group membership management for Studyhall.
//!
//! This module implements the membership core: the invariant engine that
//! creates, transfers, and dissolves admin rights while preserving "exactly
//! one admin per group", the read-only membership query service, and the
//! group lifecycle controller (create, join by invite code, delete). The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
