//! Observable controller state.
//!
//! [`ControllerState`] is the controller's own state, distinct from the room
//! snapshot it holds: the snapshot is replaced wholesale on every relevant
//! update, while the join and scroll flags evolve independently. This is the
//! view model the host reads on each render.

use parlor_core::{Membership, RoomSnapshot};

use crate::error::JoinRejected;

/// Render-ready state owned by the controller.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub(crate) room: Option<RoomSnapshot>,
    pub(crate) joining: bool,
    pub(crate) join_error: Option<JoinRejected>,
    pub(crate) at_bottom: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        // The viewport starts pinned to the bottom, as on first mount.
        Self { room: None, joining: false, join_error: None, at_bottom: true }
    }
}

impl ControllerState {
    /// Current room snapshot. `None` before attach or after the room became
    /// unavailable.
    pub fn room(&self) -> Option<&RoomSnapshot> {
        self.room.as_ref()
    }

    /// Whether a join request is in flight.
    pub fn joining(&self) -> bool {
        self.joining
    }

    /// Error from the last failed join attempt. Cleared on the next attempt.
    pub fn join_error(&self) -> Option<&JoinRejected> {
        self.join_error.as_ref()
    }

    /// Whether the viewport was at the bottom before the last update.
    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Membership phase derived from the snapshot and the join flag.
    pub fn phase(&self) -> MembershipPhase {
        match &self.room {
            None => MembershipPhase::Absent,
            Some(room) => match room.membership {
                Membership::Invite if self.joining => MembershipPhase::Joining,
                Membership::Invite => MembershipPhase::Invited,
                Membership::Join => MembershipPhase::Joined,
                Membership::Leave => MembershipPhase::Hidden,
            },
        }
    }
}

/// Where the controller is in the invite/join lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipPhase {
    /// No snapshot available; the host renders nothing.
    Absent,
    /// Invited, showing the invite prompt (possibly with a join error).
    Invited,
    /// A join request is in flight.
    Joining,
    /// Full member, showing the timeline.
    Joined,
    /// The room exists but is not visible to the local user.
    Hidden,
}
