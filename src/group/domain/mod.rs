//! Domain model for group membership and the single-admin invariant.
//!
//! The group domain models users, groups, invite codes, and the membership
//! records whose roles carry the "exactly one admin per group" invariant,
//! while keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod group;
mod ids;
mod invite;
mod membership;
mod role;
mod user;

pub use error::{ErrorKind, GroupDomainError, ParseRoleError};
pub use group::{Group, GroupName, PersistedGroupData};
pub use ids::{GroupId, UserId};
pub use invite::InviteCode;
pub use membership::Membership;
pub use role::Role;
pub use user::User;
