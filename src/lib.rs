//! Studyhall: multi-tenant study-group task tracker core.
//!
//! This crate provides the membership and task core of a study-group
//! tracker: users form groups via invite codes, manage membership under a
//! single-admin-per-group invariant, and track tasks within a group.
//!
//! # Architecture
//!
//! Studyhall follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`group`]: membership records, the single-admin invariant engine,
//!   membership queries, and group lifecycle
//! - [`task`]: group task records and the task board service

pub mod group;
pub mod task;
