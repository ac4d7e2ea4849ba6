//! Timeline events.

use serde::{Deserialize, Serialize};

use crate::{EventId, UserId};

/// An ordered message or state change delivered for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// User that sent the event.
    pub sender: UserId,
    /// Renderable body text.
    pub body: String,
    /// Server-side timestamp in milliseconds.
    pub origin_ts: u64,
}

impl TimelineEvent {
    /// Create an event with the given identity, sender, and body.
    pub fn new(
        event_id: impl Into<EventId>,
        sender: impl Into<UserId>,
        body: impl Into<String>,
        origin_ts: u64,
    ) -> Self {
        Self { event_id: event_id.into(), sender: sender.into(), body: body.into(), origin_ts }
    }
}
