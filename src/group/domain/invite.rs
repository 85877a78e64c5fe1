//! Invite codes permitting group joins without prior membership.

use super::GroupDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Characters permitted in invite codes.
///
/// Excludes `0`, `O`, `1`, and `I` so codes survive being read aloud or
/// copied by hand.
const ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in an invite code.
const CODE_LEN: usize = 8;

/// Unique token permitting [`join_group`] without prior membership.
///
/// [`join_group`]: crate::group::services::GroupLifecycleService::join_group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Derives a fresh code from random UUID bytes.
    ///
    /// Each byte indexes the 32-character alphabet, so no additional RNG
    /// dependency is needed. Uniqueness is enforced by the store, not here;
    /// the lifecycle service retries on collision.
    #[must_use]
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let code = bytes
            .iter()
            .take(CODE_LEN)
            .map(|byte| {
                let index = usize::from(byte & 0x1f);
                char::from(ALPHABET.get(index).copied().unwrap_or(b'A'))
            })
            .collect();
        Self(code)
    }

    /// Parses a user-supplied invite code.
    ///
    /// Normalises surrounding whitespace and case before validating shape.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::InvalidInviteCode`] when the value is not
    /// exactly eight characters from the code alphabet.
    pub fn parse(value: impl Into<String>) -> Result<Self, GroupDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        let shape_ok =
            normalized.len() == CODE_LEN && normalized.bytes().all(|byte| ALPHABET.contains(&byte));
        if !shape_ok {
            return Err(GroupDomainError::InvalidInviteCode(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InviteCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
