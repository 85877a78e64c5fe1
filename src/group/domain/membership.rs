//! Membership join entity between users and groups.

use super::{GroupId, Role, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The (group, user, role) association record.
///
/// A user holds at most one membership per group; the pair
/// (`group_id`, `user_id`) is the composite identity. The single-admin
/// invariant is a property of the set of memberships in a group, enforced
/// by the invariant engine's transactions rather than by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    group_id: GroupId,
    user_id: UserId,
    role: Role,
    joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates the bootstrap admin membership for a freshly created group.
    #[must_use]
    pub fn admin(group_id: GroupId, user_id: UserId, clock: &impl Clock) -> Self {
        Self::with_role(group_id, user_id, Role::Admin, clock)
    }

    /// Creates an ordinary member membership.
    #[must_use]
    pub fn member(group_id: GroupId, user_id: UserId, clock: &impl Clock) -> Self {
        Self::with_role(group_id, user_id, Role::Member, clock)
    }

    fn with_role(group_id: GroupId, user_id: UserId, role: Role, clock: &impl Clock) -> Self {
        Self {
            group_id,
            user_id,
            role,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        group_id: GroupId,
        user_id: UserId,
        role: Role,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            group_id,
            user_id,
            role,
            joined_at,
        }
    }

    /// Returns the owning group identifier.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the membership role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` when the membership holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns the join timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}
