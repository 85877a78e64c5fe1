//! Application services for group task management.

mod board;

pub use board::{CreateTaskRequest, TaskBoardService, TaskOpError, TaskOpResult, UpdateTaskRequest};
