//! Plain-text rendering of controller state.
//!
//! Exists so tests can assert on what a user would see; it is not a UI.

use parlor_app::{ControllerState, MembershipPhase};

/// Render controller state as display lines.
///
/// An absent or hidden room renders as nothing rather than failing.
pub fn render_lines(state: &ControllerState) -> Vec<String> {
    match state.phase() {
        MembershipPhase::Absent | MembershipPhase::Hidden => Vec::new(),
        MembershipPhase::Joining => vec!["Joining room...".to_owned()],
        MembershipPhase::Invited => {
            let mut lines = Vec::new();
            let inviter = state
                .room()
                .and_then(|room| room.inviter.as_ref())
                .map_or("Someone", |user| user.as_str());
            lines.push(format!("{inviter} has invited you to a room"));
            lines.push("[Join]".to_owned());
            if state.join_error().is_some() {
                lines.push("Failed to join room!".to_owned());
            }
            lines
        },
        MembershipPhase::Joined => state
            .room()
            .map(|room| {
                room.timeline
                    .iter()
                    .map(|event| format!("{}: {}", event.sender, event.body))
                    .collect()
            })
            .unwrap_or_default(),
    }
}
