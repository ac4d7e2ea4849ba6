//! Local-user membership state.

use serde::{Deserialize, Serialize};

/// The local user's relationship to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    /// Invited but not yet joined.
    Invite,
    /// Full member.
    Join,
    /// Left (or never entered) the room.
    Leave,
}

impl Membership {
    /// Membership as the protocol-level string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }
}
