//! Read-only membership views for rendering and precondition checks.

use crate::group::{
    domain::{ErrorKind, Group, GroupId, Membership, User, UserId},
    ports::{MembershipStore, StoreError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by membership queries.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The group was not found.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Maps the error onto the stable failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::GroupNotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for membership queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// A roster entry: the membership plus its user record when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    membership: Membership,
    user: Option<User>,
}

impl MemberRecord {
    /// Returns the membership.
    #[must_use]
    pub const fn membership(&self) -> &Membership {
        &self.membership
    }

    /// Returns the hydrated user record, when present.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Role-aware view of one group for one acting user.
///
/// The view is a committed snapshot taken in its own transaction. It is
/// suitable for rendering choices; mutating operations re-validate their
/// preconditions inside their own transaction, so a view that has gone
/// stale under a concurrent mutation can mislead the UI but never the
/// invariant engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    group: Group,
    acting_user: UserId,
    acting: Option<Membership>,
    roster: Vec<MemberRecord>,
}

impl GroupView {
    /// Returns the group.
    #[must_use]
    pub const fn group(&self) -> &Group {
        &self.group
    }

    /// Returns the acting user's membership, when they have one.
    #[must_use]
    pub const fn acting(&self) -> Option<&Membership> {
        self.acting.as_ref()
    }

    /// Returns the full roster, admins first, then join time.
    #[must_use]
    pub fn roster(&self) -> &[MemberRecord] {
        &self.roster
    }

    /// Returns the members eligible to succeed the acting user as admin:
    /// everyone on the roster except the acting user.
    #[must_use]
    pub fn successor_candidates(&self) -> Vec<&MemberRecord> {
        self.roster
            .iter()
            .filter(|record| record.membership().user_id() != self.acting_user)
            .collect()
    }

    /// Returns `true` when the acting user could remove the target member.
    ///
    /// Reproduces the removal preconditions for UI gating: acting user
    /// holds admin, target is someone else, target is on the roster, and
    /// target is not the admin.
    #[must_use]
    pub fn can_remove(&self, target: UserId) -> bool {
        let acting_is_admin = self.acting.as_ref().is_some_and(Membership::is_admin);
        if !acting_is_admin || target == self.acting_user {
            return false;
        }
        self.roster
            .iter()
            .any(|record| record.membership().user_id() == target && !record.membership().is_admin())
    }
}

/// Read-only membership query service.
#[derive(Clone)]
pub struct MembershipQueryService<S>
where
    S: MembershipStore,
{
    store: Arc<S>,
}

impl<S> MembershipQueryService<S>
where
    S: MembershipStore,
{
    /// Creates a new query service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Builds the role-aware view of a group for an acting user.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::GroupNotFound`] when the group does not exist.
    pub async fn group_view(&self, group: GroupId, acting_user: UserId) -> QueryResult<GroupView> {
        self.store
            .serialized(move |tx| {
                let group_record = tx.group(group)?.ok_or(QueryError::GroupNotFound(group))?;
                let acting = tx.membership(group, acting_user)?;

                let memberships = tx.list_memberships(group)?;
                let mut roster = Vec::with_capacity(memberships.len());
                for membership in memberships {
                    let user = tx.user(membership.user_id())?;
                    roster.push(MemberRecord { membership, user });
                }

                Ok(GroupView {
                    group: group_record,
                    acting_user,
                    acting,
                    roster,
                })
            })
            .await
    }
}
