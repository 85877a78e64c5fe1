//! Group lifecycle orchestration: create, join, delete.

use crate::group::{
    domain::{ErrorKind, Group, GroupDomainError, GroupId, GroupName, InviteCode, Membership, UserId},
    ports::{InviteCodeIssuer, MembershipStore, StoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Maximum invite-code allocation attempts per group creation.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Service-level errors for group lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] GroupDomainError),

    /// No group matches the supplied invite code.
    #[error("invalid invite code")]
    InvalidCode,

    /// Every invite-code allocation attempt collided.
    #[error("could not allocate a unique invite code")]
    CodeGenerationFailed,

    /// The group was not found.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The requester does not hold the admin role.
    #[error("only the group admin can delete the group")]
    Forbidden,

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Maps the error onto the stable failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::InvalidCode => ErrorKind::InvalidInput,
            Self::GroupNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::CodeGenerationFailed | Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for group lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Outcome of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The group the invite code resolved to.
    pub group_id: GroupId,
    /// `true` when the user already held a membership and the call was a
    /// no-op.
    pub already_member: bool,
}

/// Group lifecycle orchestration service.
#[derive(Clone)]
pub struct GroupLifecycleService<S, C, I>
where
    S: MembershipStore,
    C: Clock + Send + Sync + 'static,
    I: InviteCodeIssuer,
{
    store: Arc<S>,
    clock: Arc<C>,
    codes: Arc<I>,
}

impl<S, C, I> GroupLifecycleService<S, C, I>
where
    S: MembershipStore,
    C: Clock + Send + Sync + 'static,
    I: InviteCodeIssuer,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, codes: Arc<I>) -> Self {
        Self { store, clock, codes }
    }

    /// Creates a group and bootstraps the creator as its admin.
    ///
    /// The group row and the creator's admin membership are inserted in one
    /// transaction, so a group never exists without exactly one admin.
    /// Invite-code collisions retry with a fresh code, bounded at five
    /// attempts.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::NameTooShort`] (wrapped) for invalid
    /// names and [`LifecycleError::CodeGenerationFailed`] when every
    /// allocation attempt collided.
    pub async fn create_group(
        &self,
        name: impl Into<String> + Send,
        creator: UserId,
    ) -> LifecycleResult<Group> {
        let group_name = GroupName::new(name)?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.codes.issue();
            let group = Group::new(group_name.clone(), code, &*self.clock);
            let membership = Membership::admin(group.id(), creator, &*self.clock);

            let attempt: Result<Group, StoreError> = self
                .store
                .serialized(move |tx| {
                    tx.insert_group(&group)?;
                    tx.insert_membership(&membership)?;
                    Ok(group)
                })
                .await;

            match attempt {
                Err(StoreError::DuplicateInviteCode(_)) => {}
                other => return Ok(other?),
            }
        }

        Err(LifecycleError::CodeGenerationFailed)
    }

    /// Joins a group by invite code.
    ///
    /// Idempotent: a user who already holds a membership gets a successful
    /// no-op outcome with `already_member` set, never a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidCode`] when the code is malformed
    /// or matches no group.
    pub async fn join_group(
        &self,
        raw_code: &str,
        user: UserId,
    ) -> LifecycleResult<JoinOutcome> {
        let code = InviteCode::parse(raw_code).map_err(|_| LifecycleError::InvalidCode)?;
        let clock = Arc::clone(&self.clock);

        self.store
            .serialized(move |tx| {
                let group = tx
                    .group_by_invite_code(&code)?
                    .ok_or(LifecycleError::InvalidCode)?;

                if tx.membership(group.id(), user)?.is_some() {
                    return Ok(JoinOutcome {
                        group_id: group.id(),
                        already_member: true,
                    });
                }

                let membership = Membership::member(group.id(), user, &*clock);
                tx.insert_membership(&membership)?;
                Ok(JoinOutcome {
                    group_id: group.id(),
                    already_member: false,
                })
            })
            .await
    }

    /// Deletes a group, cascading to its memberships and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::GroupNotFound`] when the group does not
    /// exist and [`LifecycleError::Forbidden`] when the requester does not
    /// hold the admin role.
    pub async fn delete_group(&self, group: GroupId, requester: UserId) -> LifecycleResult<()> {
        self.store
            .serialized(move |tx| {
                tx.group(group)?
                    .ok_or(LifecycleError::GroupNotFound(group))?;
                tx.membership(group, requester)?
                    .filter(Membership::is_admin)
                    .ok_or(LifecycleError::Forbidden)?;
                tx.delete_group(group)?;
                Ok(())
            })
            .await
    }
}
