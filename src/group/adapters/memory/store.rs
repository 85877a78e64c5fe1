//! In-memory membership store for service and invariant tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::group::{
    domain::{Group, GroupId, InviteCode, Membership, Role, User, UserId},
    ports::{MembershipStore, StoreError, StoreTx, TxResult},
};
use crate::task::domain::{PersistedTaskData, Task, TaskId};

/// Thread-safe in-memory membership store.
///
/// `serialized` holds one mutex for the whole transaction closure, which
/// gives the serializable isolation the port demands, and runs the closure
/// against a scratch copy of the state that is swapped in only on success,
/// which gives all-or-nothing atomicity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    memberships: HashMap<(GroupId, UserId), Membership>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryMembershipStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn serialized<T, E, F>(&self, f: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E> + Send + 'static,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))?;

        let mut scratch = guard.clone();
        let outcome = f(&mut MemoryTx {
            state: &mut scratch,
        });
        if outcome.is_ok() {
            *guard = scratch;
        }
        outcome
    }
}

/// Transaction handle over a scratch copy of the store state.
struct MemoryTx<'a> {
    state: &'a mut MemoryState,
}

impl StoreTx for MemoryTx<'_> {
    fn insert_group(&mut self, group: &Group) -> TxResult<()> {
        let code_taken = self
            .state
            .groups
            .values()
            .any(|existing| existing.invite_code() == group.invite_code());
        if code_taken {
            return Err(StoreError::DuplicateInviteCode(group.invite_code().clone()));
        }
        self.state.groups.insert(group.id(), group.clone());
        Ok(())
    }

    fn group(&mut self, id: GroupId) -> TxResult<Option<Group>> {
        Ok(self.state.groups.get(&id).cloned())
    }

    fn group_by_invite_code(&mut self, code: &InviteCode) -> TxResult<Option<Group>> {
        Ok(self
            .state
            .groups
            .values()
            .find(|group| group.invite_code() == code)
            .cloned())
    }

    fn delete_group(&mut self, id: GroupId) -> TxResult<()> {
        self.state
            .groups
            .remove(&id)
            .ok_or(StoreError::GroupNotFound(id))?;
        self.state
            .memberships
            .retain(|(group_id, _), _| *group_id != id);
        self.state.tasks.retain(|_, task| task.group_id() != id);
        Ok(())
    }

    fn insert_membership(&mut self, membership: &Membership) -> TxResult<()> {
        let key = (membership.group_id(), membership.user_id());
        if self.state.memberships.contains_key(&key) {
            return Err(StoreError::DuplicateMembership {
                group: membership.group_id(),
                user: membership.user_id(),
            });
        }
        self.state.memberships.insert(key, membership.clone());
        Ok(())
    }

    fn membership(&mut self, group: GroupId, user: UserId) -> TxResult<Option<Membership>> {
        Ok(self.state.memberships.get(&(group, user)).cloned())
    }

    fn list_memberships(&mut self, group: GroupId) -> TxResult<Vec<Membership>> {
        let mut rows: Vec<Membership> = self
            .state
            .memberships
            .values()
            .filter(|membership| membership.group_id() == group)
            .cloned()
            .collect();
        rows.sort_by_key(|membership| {
            (
                membership.role(),
                membership.joined_at(),
                membership.user_id(),
            )
        });
        Ok(rows)
    }

    fn set_role(&mut self, group: GroupId, user: UserId, role: Role) -> TxResult<()> {
        let key = (group, user);
        let current = self
            .state
            .memberships
            .get(&key)
            .ok_or(StoreError::MembershipNotFound { group, user })?;
        let updated = Membership::from_persisted(group, user, role, current.joined_at());
        self.state.memberships.insert(key, updated);
        Ok(())
    }

    fn demote_admins(&mut self, group: GroupId) -> TxResult<usize> {
        let admin_keys: Vec<(GroupId, UserId)> = self
            .state
            .memberships
            .iter()
            .filter(|((group_id, _), membership)| *group_id == group && membership.is_admin())
            .map(|(key, _)| *key)
            .collect();

        for key in &admin_keys {
            if let Some(current) = self.state.memberships.get(key) {
                let demoted = Membership::from_persisted(
                    current.group_id(),
                    current.user_id(),
                    Role::Member,
                    current.joined_at(),
                );
                self.state.memberships.insert(*key, demoted);
            }
        }
        Ok(admin_keys.len())
    }

    fn delete_membership(&mut self, group: GroupId, user: UserId) -> TxResult<()> {
        self.state
            .memberships
            .remove(&(group, user))
            .ok_or(StoreError::MembershipNotFound { group, user })?;
        Ok(())
    }

    fn insert_user(&mut self, user: &User) -> TxResult<()> {
        self.state.users.insert(user.id(), user.clone());
        Ok(())
    }

    fn user(&mut self, id: UserId) -> TxResult<Option<User>> {
        Ok(self.state.users.get(&id).cloned())
    }

    fn insert_task(&mut self, task: &Task) -> TxResult<()> {
        self.state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn task(&mut self, id: TaskId) -> TxResult<Option<Task>> {
        Ok(self.state.tasks.get(&id).cloned())
    }

    fn update_task(&mut self, task: &Task) -> TxResult<()> {
        if !self.state.tasks.contains_key(&task.id()) {
            return Err(StoreError::TaskNotFound(task.id()));
        }
        self.state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> TxResult<()> {
        self.state
            .tasks
            .remove(&id)
            .ok_or(StoreError::TaskNotFound(id))?;
        Ok(())
    }

    fn list_tasks(&mut self, group: GroupId) -> TxResult<Vec<Task>> {
        let mut rows: Vec<Task> = self
            .state
            .tasks
            .values()
            .filter(|task| task.group_id() == group)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(a.id().cmp(&b.id())));
        Ok(rows)
    }

    fn clear_assignments(&mut self, group: GroupId, user: UserId) -> TxResult<usize> {
        let assigned: Vec<TaskId> = self
            .state
            .tasks
            .values()
            .filter(|task| task.group_id() == group && task.assignee() == Some(user))
            .map(Task::id)
            .collect();

        for id in &assigned {
            if let Some(task) = self.state.tasks.get(id) {
                let cleared = Task::from_persisted(PersistedTaskData {
                    id: task.id(),
                    group_id: task.group_id(),
                    title: task.title().clone(),
                    description: task.description().map(ToOwned::to_owned),
                    priority: task.priority(),
                    status: task.status(),
                    due_at: task.due_at(),
                    assignee: None,
                    created_at: task.created_at(),
                    updated_at: task.updated_at(),
                });
                self.state.tasks.insert(*id, cleared);
            }
        }
        Ok(assigned.len())
    }
}
