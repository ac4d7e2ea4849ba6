//! Immutable room snapshots.

use serde::{Deserialize, Serialize};

use crate::{Membership, RoomId, TimelineEvent, UserId};

/// A point-in-time view of a room as seen by the local user.
///
/// Produced fresh by the messaging client on every relevant update and
/// replaced wholesale by the controller; never patched field-by-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Room identifier.
    pub room_id: RoomId,
    /// The local user's membership in this room.
    pub membership: Membership,
    /// Who invited the local user. Present only while `membership` is
    /// [`Membership::Invite`].
    pub inviter: Option<UserId>,
    /// Ordered timeline events.
    pub timeline: Vec<TimelineEvent>,
}

impl RoomSnapshot {
    /// Create an empty snapshot with the given membership.
    pub fn new(room_id: impl Into<RoomId>, membership: Membership) -> Self {
        Self { room_id: room_id.into(), membership, inviter: None, timeline: Vec::new() }
    }

    /// Attach the inviting user (invite-state rooms only).
    pub fn with_inviter(mut self, inviter: impl Into<UserId>) -> Self {
        self.inviter = Some(inviter.into());
        self
    }

    /// Attach the ordered timeline.
    pub fn with_timeline(mut self, timeline: impl IntoIterator<Item = TimelineEvent>) -> Self {
        self.timeline = timeline.into_iter().collect();
        self
    }

    /// Most recent timeline event. `None` for an empty timeline.
    pub fn last_event(&self) -> Option<&TimelineEvent> {
        self.timeline.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_event_is_newest() {
        let snapshot = RoomSnapshot::new("!r:example.org", Membership::Join).with_timeline([
            TimelineEvent::new("$1", "@a:example.org", "first", 1),
            TimelineEvent::new("$2", "@a:example.org", "second", 2),
        ]);

        assert_eq!(snapshot.last_event().map(|e| e.body.as_str()), Some("second"));
    }

    #[test]
    fn empty_snapshot_has_no_events() {
        let snapshot = RoomSnapshot::new("!r:example.org", Membership::Invite)
            .with_inviter("@inviter:example.org");

        assert!(snapshot.last_event().is_none());
        assert_eq!(snapshot.inviter.as_ref().map(UserId::as_str), Some("@inviter:example.org"));
    }
}
