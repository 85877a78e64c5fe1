//! Invite code issuing port.

use crate::group::domain::InviteCode;

/// Source of fresh invite codes for new groups.
///
/// Issued codes are not guaranteed unique; the lifecycle service retries a
/// bounded number of times when the store reports a collision. Kept as a
/// port so collision behaviour is testable with a mocked issuer.
pub trait InviteCodeIssuer: Send + Sync {
    /// Produces a fresh candidate invite code.
    fn issue(&self) -> InviteCode;
}
