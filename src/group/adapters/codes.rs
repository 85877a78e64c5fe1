//! Default invite code issuer.

use crate::group::domain::InviteCode;
use crate::group::ports::InviteCodeIssuer;

/// Issues invite codes derived from random UUID bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodeIssuer;

impl InviteCodeIssuer for UuidCodeIssuer {
    fn issue(&self) -> InviteCode {
        InviteCode::generate()
    }
}
