//! Invariant engine for admin-preserving membership mutations.
//!
//! Every operation runs as one serializable transaction and re-validates
//! its preconditions inside that transaction, so a stale read taken by the
//! caller (for rendering, say) can never corrupt the single-admin
//! invariant: concurrent operations on the same group serialize at the
//! store and each observes the other's committed writes or none at all.

use crate::group::{
    domain::{ErrorKind, GroupId, Membership, Role, UserId},
    ports::{MembershipStore, StoreError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by invariant engine operations.
#[derive(Debug, Clone, Error)]
pub enum GroupOpError {
    /// The requester has no membership in the group.
    #[error("not a member of this group")]
    NotMember,

    /// The requester does not hold the admin role.
    #[error("only the group admin can transfer the admin role")]
    NotAdmin,

    /// The requester does not hold the admin role required for removal.
    #[error("only the group admin can remove members")]
    Forbidden,

    /// The transfer target has no membership in the group.
    #[error("target user is not a member of this group")]
    TargetNotMember,

    /// An admin attempted to leave without naming a successor.
    #[error("admin must choose a successor to leave")]
    SuccessorRequired,

    /// The named successor is the leaving admin.
    #[error("successor must be a different member")]
    SuccessorInvalid,

    /// The named successor has no membership in the group.
    #[error("successor is not a member of this group")]
    SuccessorNotMember,

    /// An admin attempted to remove themselves through the removal path.
    #[error("use the leave flow to remove yourself")]
    SelfRemoval,

    /// The removal target holds the admin role.
    #[error("transfer admin first before removing the admin")]
    AdminMustTransferFirst,

    /// The removal target has no membership in the group.
    #[error("member not found")]
    MemberNotFound,

    /// The sole admin attempted to leave while the policy forbids it.
    #[error("the sole admin cannot leave; delete the group instead")]
    SoloAdminMustDelete,

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GroupOpError {
    /// Maps the error onto the stable failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotMember | Self::MemberNotFound => ErrorKind::NotFound,
            Self::NotAdmin | Self::Forbidden => ErrorKind::Forbidden,
            Self::TargetNotMember
            | Self::SuccessorRequired
            | Self::SuccessorInvalid
            | Self::SuccessorNotMember
            | Self::SelfRemoval => ErrorKind::InvalidInput,
            Self::AdminMustTransferFirst | Self::SoloAdminMustDelete => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for invariant engine operations.
pub type GroupOpResult<T> = Result<T, GroupOpError>;

/// Behavioural switches for ambiguous membership edge cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupPolicy {
    /// Whether the sole admin of an otherwise-empty group may leave,
    /// leaving the group memberless. When `false` (the default) the admin
    /// is directed to delete the group instead.
    pub allow_admin_solo_leave: bool,
}

/// Membership state machine preserving "exactly one admin per group".
#[derive(Clone)]
pub struct GroupInvariantEngine<S>
where
    S: MembershipStore,
{
    store: Arc<S>,
    policy: GroupPolicy,
}

impl<S> GroupInvariantEngine<S>
where
    S: MembershipStore,
{
    /// Creates an engine with the default policy.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, GroupPolicy::default())
    }

    /// Creates an engine with an explicit policy.
    #[must_use]
    pub const fn with_policy(store: Arc<S>, policy: GroupPolicy) -> Self {
        Self { store, policy }
    }

    /// Transfers the admin role from the requester to the target member.
    ///
    /// Demotes every current admin before promoting the target, repairing
    /// any pre-existing duplicate-admin corruption in passing. Naming the
    /// current admin as target is a permitted no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GroupOpError::NotAdmin`] when the requester does not hold
    /// the admin role in the group, or [`GroupOpError::TargetNotMember`]
    /// when the target has no membership there.
    pub async fn transfer_admin(
        &self,
        group: GroupId,
        requester: UserId,
        target: UserId,
    ) -> GroupOpResult<()> {
        self.store
            .serialized(move |tx| {
                tx.membership(group, requester)?
                    .filter(Membership::is_admin)
                    .ok_or(GroupOpError::NotAdmin)?;
                let promoted = tx
                    .membership(group, target)?
                    .ok_or(GroupOpError::TargetNotMember)?;

                tx.demote_admins(group)?;
                tx.set_role(group, promoted.user_id(), Role::Admin)?;
                Ok(())
            })
            .await
    }

    /// Removes the requester's membership, reassigning the admin role first
    /// when the requester holds it.
    ///
    /// Members leave unconditionally. An admin leaving a group that still
    /// has other members must name a successor, who is promoted before the
    /// requester's row is deleted, so the group never commits without an
    /// admin. The leaver's task assignments are nulled in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`GroupOpError::NotMember`] when the requester has no
    /// membership, [`GroupOpError::SuccessorRequired`] /
    /// [`GroupOpError::SuccessorInvalid`] / [`GroupOpError::SuccessorNotMember`]
    /// on successor validation failures, and
    /// [`GroupOpError::SoloAdminMustDelete`] when the sole admin of an
    /// otherwise-empty group attempts to leave under the default policy.
    pub async fn leave_group(
        &self,
        group: GroupId,
        requester: UserId,
        successor: Option<UserId>,
    ) -> GroupOpResult<()> {
        let policy = self.policy;
        self.store
            .serialized(move |tx| {
                let acting = tx.membership(group, requester)?.ok_or(GroupOpError::NotMember)?;

                if !acting.is_admin() {
                    tx.delete_membership(group, requester)?;
                    tx.clear_assignments(group, requester)?;
                    return Ok(());
                }

                let remaining = tx
                    .list_memberships(group)?
                    .into_iter()
                    .filter(|membership| membership.user_id() != requester)
                    .count();

                if remaining == 0 {
                    if !policy.allow_admin_solo_leave {
                        return Err(GroupOpError::SoloAdminMustDelete);
                    }
                    tx.delete_membership(group, requester)?;
                    tx.clear_assignments(group, requester)?;
                    return Ok(());
                }

                let successor_id = successor.ok_or(GroupOpError::SuccessorRequired)?;
                if successor_id == requester {
                    return Err(GroupOpError::SuccessorInvalid);
                }
                let promoted = tx
                    .membership(group, successor_id)?
                    .ok_or(GroupOpError::SuccessorNotMember)?;

                // Order matters: promote before delete so no intermediate
                // state without an admin can ever commit.
                tx.demote_admins(group)?;
                tx.set_role(group, promoted.user_id(), Role::Admin)?;
                tx.delete_membership(group, requester)?;
                tx.clear_assignments(group, requester)?;
                Ok(())
            })
            .await
    }

    /// Removes the target's membership on behalf of the group admin.
    ///
    /// Self-removal must go through [`Self::leave_group`]; removing the
    /// admin is refused outright; the caller must transfer the role away
    /// first, which keeps the removal path incapable of producing an
    /// admin-less group. The target's task assignments are nulled in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`GroupOpError::Forbidden`] when the requester is not the
    /// admin, [`GroupOpError::SelfRemoval`] when targeting themselves,
    /// [`GroupOpError::MemberNotFound`] when the target has no membership,
    /// and [`GroupOpError::AdminMustTransferFirst`] when the target holds
    /// the admin role.
    pub async fn remove_member(
        &self,
        group: GroupId,
        requester: UserId,
        target: UserId,
    ) -> GroupOpResult<()> {
        self.store
            .serialized(move |tx| {
                tx.membership(group, requester)?
                    .filter(Membership::is_admin)
                    .ok_or(GroupOpError::Forbidden)?;

                if target == requester {
                    return Err(GroupOpError::SelfRemoval);
                }

                let removed = tx
                    .membership(group, target)?
                    .ok_or(GroupOpError::MemberNotFound)?;
                if removed.is_admin() {
                    return Err(GroupOpError::AdminMustTransferFirst);
                }

                tx.delete_membership(group, target)?;
                tx.clear_assignments(group, target)?;
                Ok(())
            })
            .await
    }
}
