//! User identity record.
//!
//! Identity provisioning (sign-in, session resolution) lives outside this
//! crate; the type exists so rosters and tests can hydrate member views.

use super::{GroupDomainError, UserId};
use serde::{Deserialize, Serialize};

/// User identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    display_name: Option<String>,
    display_tag: Option<String>,
}

impl User {
    /// Creates a user record with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::EmptyEmail`] when the email is empty
    /// after trimming.
    pub fn new(email: impl Into<String>) -> Result<Self, GroupDomainError> {
        let raw = email.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(GroupDomainError::EmptyEmail);
        }
        Ok(Self {
            id: UserId::new(),
            email: normalized.to_owned(),
            display_name: None,
            display_tag: None,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: UserId,
        email: String,
        display_name: Option<String>,
        display_tag: Option<String>,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            display_tag,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the cosmetic display tag.
    #[must_use]
    pub fn with_display_tag(mut self, tag: impl Into<String>) -> Self {
        self.display_tag = Some(tag.into());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the display tag, if set.
    #[must_use]
    pub fn display_tag(&self) -> Option<&str> {
        self.display_tag.as_deref()
    }
}
