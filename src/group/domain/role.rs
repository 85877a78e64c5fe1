//! Membership role enumeration.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};

/// Role held by a membership within a group.
///
/// The variant order matters: sorting memberships by role yields the
/// admin-first ordering the roster views rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The single administrator of the group.
    Admin,
    /// An ordinary group member.
    Member,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Returns `true` for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    /// Parses a role from its storage representation.
    ///
    /// Normalises case and surrounding whitespace so that legacy rows
    /// written as `ADMIN`/`MEMBER` parse to the same closed enumeration;
    /// every other value is rejected at the store boundary.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
