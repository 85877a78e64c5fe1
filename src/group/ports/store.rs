//! Transactional membership store port.
//!
//! The store is an external collaborator: a transactional relational
//! database reachable through the primitives below. Correctness of the
//! single-admin invariant rests entirely on [`MembershipStore::serialized`]
//! running each compound mutation as one atomic unit under serializable
//! isolation; the invariant engine performs no in-process locking.

use crate::group::domain::{Group, GroupId, InviteCode, Membership, Role, User, UserId};
use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for primitive store operations inside a transaction.
pub type TxResult<T> = Result<T, StoreError>;

/// Transactional store contract.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Runs `f` inside a serializable transaction.
    ///
    /// The closure receives the transaction handle and its result decides
    /// the outcome: `Ok` commits, any `Err` aborts with no partial write
    /// visible to other transactions. Mirrors Diesel's
    /// `Connection::transaction` shape so the `PostgreSQL` adapter is a thin
    /// wrapper.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a [`StoreError`] converted into `E`
    /// when the transaction itself fails to start or commit.
    async fn serialized<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E> + Send + 'static;
}

/// Primitive operations available inside a store transaction.
///
/// All methods are synchronous: the transaction handle is only ever used
/// inside the closure passed to [`MembershipStore::serialized`], which the
/// adapters run on a blocking context.
pub trait StoreTx {
    /// Stores a new group row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateInviteCode`] when the invite code is
    /// already taken.
    fn insert_group(&mut self, group: &Group) -> TxResult<()>;

    /// Finds a group by identifier. Returns `None` when absent.
    fn group(&mut self, id: GroupId) -> TxResult<Option<Group>>;

    /// Finds a group by invite code. Returns `None` when absent.
    fn group_by_invite_code(&mut self, code: &InviteCode) -> TxResult<Option<Group>>;

    /// Deletes a group, cascading to its memberships and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::GroupNotFound`] when the group does not exist.
    fn delete_group(&mut self, id: GroupId) -> TxResult<()>;

    /// Stores a new membership row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateMembership`] when the (group, user)
    /// pair already has a row.
    fn insert_membership(&mut self, membership: &Membership) -> TxResult<()>;

    /// Finds the membership for a (group, user) pair. Returns `None` when
    /// absent.
    fn membership(&mut self, group: GroupId, user: UserId) -> TxResult<Option<Membership>>;

    /// Returns every membership of the group, admins first, then join time.
    fn list_memberships(&mut self, group: GroupId) -> TxResult<Vec<Membership>>;

    /// Sets the role on an existing membership.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MembershipNotFound`] when no row exists for
    /// the pair.
    fn set_role(&mut self, group: GroupId, user: UserId, role: Role) -> TxResult<()>;

    /// Demotes every admin membership of the group to member.
    ///
    /// Returns the number of rows changed. Demoting in bulk repairs any
    /// pre-existing duplicate-admin corruption before a promotion
    /// re-establishes the invariant.
    fn demote_admins(&mut self, group: GroupId) -> TxResult<usize>;

    /// Deletes the membership for a (group, user) pair.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MembershipNotFound`] when no row exists for
    /// the pair.
    fn delete_membership(&mut self, group: GroupId, user: UserId) -> TxResult<()>;

    /// Stores a new user row.
    fn insert_user(&mut self, user: &User) -> TxResult<()>;

    /// Finds a user by identifier. Returns `None` when absent.
    fn user(&mut self, id: UserId) -> TxResult<Option<User>>;

    /// Stores a new task row.
    fn insert_task(&mut self, task: &Task) -> TxResult<()>;

    /// Finds a task by identifier. Returns `None` when absent.
    fn task(&mut self, id: TaskId) -> TxResult<Option<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the task does not exist.
    fn update_task(&mut self, task: &Task) -> TxResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskNotFound`] when the task does not exist.
    fn delete_task(&mut self, id: TaskId) -> TxResult<()>;

    /// Returns every task owned by the group.
    fn list_tasks(&mut self, group: GroupId) -> TxResult<Vec<Task>>;

    /// Nulls the assignee on every task of the group assigned to the user.
    ///
    /// Returns the number of tasks changed. Called by the invariant engine
    /// when a membership is deleted so no dangling assignee references
    /// survive a leave or removal.
    fn clear_assignments(&mut self, group: GroupId, user: UserId) -> TxResult<usize>;
}

/// Errors returned by membership store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A group with the same invite code already exists.
    #[error("duplicate invite code: {0}")]
    DuplicateInviteCode(InviteCode),

    /// The (group, user) pair already has a membership row.
    #[error("duplicate membership: group {group} user {user}")]
    DuplicateMembership {
        /// Group half of the composite key.
        group: GroupId,
        /// User half of the composite key.
        user: UserId,
    },

    /// No membership row exists for the (group, user) pair.
    #[error("membership not found: group {group} user {user}")]
    MembershipNotFound {
        /// Group half of the composite key.
        group: GroupId,
        /// User half of the composite key.
        user: UserId,
    },

    /// The group was not found.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Backend failure (connection, commit, serialization conflict).
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
