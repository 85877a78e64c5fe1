//! Error types for group domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain group values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupDomainError {
    /// The group name is shorter than two characters after trimming.
    #[error("group name must be at least 2 characters")]
    NameTooShort,

    /// The invite code does not match the expected shape.
    #[error("invalid invite code '{0}'")]
    InvalidInviteCode(String),

    /// The user email is empty after trimming.
    #[error("user email must not be empty")]
    EmptyEmail,
}

/// Error returned while parsing membership roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership role: {0}")]
pub struct ParseRoleError(pub String);

/// Stable classification of operation failures.
///
/// Callers (an HTTP layer, for example) map these onto transport-level
/// statuses without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed entity does not exist.
    NotFound,
    /// The acting user lacks the required role.
    Forbidden,
    /// The request payload is invalid or references a non-member.
    InvalidInput,
    /// Invariant-preserving preconditions are unmet.
    Conflict,
    /// Store failure or exhausted internal retry.
    Internal,
}
