//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is shorter than two characters after trimming.
    #[error("task title must be at least 2 characters")]
    TitleTooShort,

    /// The priority value is outside the `1..=3` range.
    #[error("invalid task priority {0}, expected 1, 2, or 3")]
    InvalidPriority(i16),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
