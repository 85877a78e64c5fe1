//! Group aggregate and validated group name.

use super::{GroupDomainError, GroupId, InviteCode};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum group name length after trimming.
const MIN_NAME_LEN: usize = 2;

/// Validated display name for a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    /// Creates a validated group name.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::NameTooShort`] when the trimmed value is
    /// shorter than two characters.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.chars().count() < MIN_NAME_LEN {
            return Err(GroupDomainError::NameTooShort);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: GroupName,
    invite_code: InviteCode,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGroupData {
    /// Persisted group identifier.
    pub id: GroupId,
    /// Persisted group name.
    pub name: GroupName,
    /// Persisted invite code.
    pub invite_code: InviteCode,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group with a fresh identifier.
    #[must_use]
    pub fn new(name: GroupName, invite_code: InviteCode, clock: &impl Clock) -> Self {
        Self {
            id: GroupId::new(),
            name,
            invite_code,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a group from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGroupData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            invite_code: data.invite_code,
            created_at: data.created_at,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group name.
    #[must_use]
    pub const fn name(&self) -> &GroupName {
        &self.name
    }

    /// Returns the invite code.
    #[must_use]
    pub const fn invite_code(&self) -> &InviteCode {
        &self.invite_code
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
