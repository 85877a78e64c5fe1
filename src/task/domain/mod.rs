//! Domain model for group task records.
//!
//! Tasks are plain field-validated records owned by a group. The one foreign
//! invariant, that an assignee must hold a membership of the owning group, is
//! enforced transactionally by the task service and respected by the group
//! invariant engine's removal paths.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use task::{PersistedTaskData, Priority, Task, TaskDetails, TaskStatus, TaskTitle};
