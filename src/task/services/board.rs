//! Task board orchestration for group task records.

use crate::group::{
    domain::{ErrorKind, GroupId, UserId},
    ports::{MembershipStore, StoreError},
};
use crate::task::domain::{
    Priority, Task, TaskDetails, TaskDomainError, TaskId, TaskStatus, TaskTitle,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task board operations.
#[derive(Debug, Clone, Error)]
pub enum TaskOpError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The acting user has no membership in the owning group.
    #[error("only group members can manage tasks")]
    Forbidden,

    /// No task with this identifier exists in the addressed group.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The requested assignee has no membership in the owning group.
    #[error("assignee must be a member of the group")]
    AssigneeNotMember(UserId),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskOpError {
    /// Maps the error onto the stable failure taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::AssigneeNotMember(_) => ErrorKind::InvalidInput,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for task board operations.
pub type TaskOpResult<T> = Result<T, TaskOpError>;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    group: GroupId,
    title: String,
    description: Option<String>,
    priority: Priority,
    due_at: Option<DateTime<Utc>>,
    assignee: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(group: GroupId, title: impl Into<String>) -> Self {
        Self {
            group,
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_at: None,
            assignee: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Partial update of a task; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    assignee: Option<Option<UserId>>,
    due_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the workflow status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

/// Task board orchestration service.
///
/// Every operation requires the acting user's membership in the owning
/// group and runs inside one store transaction, so the assignee-must-be-
/// member constraint is checked against the same state the write commits
/// into.
#[derive(Clone)]
pub struct TaskBoardService<S, C>
where
    S: MembershipStore,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskBoardService<S, C>
where
    S: MembershipStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task board service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task in the [`TaskStatus::Todo`] state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TitleTooShort`] (wrapped) for invalid
    /// titles, [`TaskOpError::Forbidden`] when the actor is not a member,
    /// and [`TaskOpError::AssigneeNotMember`] when the initial assignee
    /// has no membership in the group.
    pub async fn create_task(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> TaskOpResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let clock = Arc::clone(&self.clock);

        self.store
            .serialized(move |tx| {
                tx.membership(request.group, actor)?
                    .ok_or(TaskOpError::Forbidden)?;
                if let Some(assignee) = request.assignee {
                    tx.membership(request.group, assignee)?
                        .ok_or(TaskOpError::AssigneeNotMember(assignee))?;
                }

                let details = TaskDetails {
                    description: request.description,
                    priority: request.priority,
                    due_at: request.due_at,
                    assignee: request.assignee,
                };
                let task = Task::new(request.group, title, details, &*clock);
                tx.insert_task(&task)?;
                Ok(task)
            })
            .await
    }

    /// Applies a partial update to a task of the group.
    ///
    /// The task must belong to the addressed group; tasks of other groups
    /// are reported as not found, which prevents cross-group edits.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Forbidden`] when the actor is not a member,
    /// [`TaskOpError::TaskNotFound`] when the task does not exist in the
    /// group, and [`TaskOpError::AssigneeNotMember`] when assigning a
    /// non-member.
    pub async fn update_task(
        &self,
        group: GroupId,
        actor: UserId,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskOpResult<Task> {
        let clock = Arc::clone(&self.clock);

        self.store
            .serialized(move |tx| {
                tx.membership(group, actor)?.ok_or(TaskOpError::Forbidden)?;
                let mut task = tx
                    .task(task_id)?
                    .filter(|existing| existing.group_id() == group)
                    .ok_or(TaskOpError::TaskNotFound(task_id))?;

                if let Some(status) = request.status {
                    task.set_status(status, &*clock);
                }
                if let Some(priority) = request.priority {
                    task.set_priority(priority, &*clock);
                }
                if let Some(assignee) = request.assignee {
                    if let Some(user) = assignee {
                        tx.membership(group, user)?
                            .ok_or(TaskOpError::AssigneeNotMember(user))?;
                    }
                    task.assign(assignee, &*clock);
                }
                if let Some(due_at) = request.due_at {
                    task.set_due_at(due_at, &*clock);
                }

                tx.update_task(&task)?;
                Ok(task)
            })
            .await
    }

    /// Deletes a task of the group.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Forbidden`] when the actor is not a member
    /// and [`TaskOpError::TaskNotFound`] when the task does not exist in
    /// the group.
    pub async fn delete_task(
        &self,
        group: GroupId,
        actor: UserId,
        task_id: TaskId,
    ) -> TaskOpResult<()> {
        self.store
            .serialized(move |tx| {
                tx.membership(group, actor)?.ok_or(TaskOpError::Forbidden)?;
                tx.task(task_id)?
                    .filter(|existing| existing.group_id() == group)
                    .ok_or(TaskOpError::TaskNotFound(task_id))?;
                tx.delete_task(task_id)?;
                Ok(())
            })
            .await
    }

    /// Lists the group's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Forbidden`] when the actor is not a member.
    pub async fn list_tasks(&self, group: GroupId, actor: UserId) -> TaskOpResult<Vec<Task>> {
        self.store
            .serialized(move |tx| {
                tx.membership(group, actor)?.ok_or(TaskOpError::Forbidden)?;
                Ok(tx.list_tasks(group)?)
            })
            .await
    }
}
