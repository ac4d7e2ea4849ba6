//! Messaging client seam.
//!
//! The controller consumes a [`MessagingClient`] it does not own: the live
//! connection is shared, so implementations are expected to be cheap handles
//! (the test harness hands out clones of one shared client). The controller
//! is generic over this trait rather than reaching into process-wide state.

use std::future::Future;

use parlor_core::{RoomId, RoomSnapshot, TimelineEvent};
use tokio::sync::broadcast;

use crate::error::JoinRejected;

/// A timeline update delivered on the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineUpdate {
    /// Room the event belongs to.
    pub room_id: RoomId,
    /// The delivered event.
    pub event: TimelineEvent,
    /// True when the event was prepended (back-pagination) rather than
    /// appended live.
    pub prepended: bool,
}

/// Handle to the messaging service consumed by the controller.
pub trait MessagingClient {
    /// Fetch a fresh snapshot of a room. `None` if the room is unknown to
    /// this client (or no longer visible to the local user).
    fn get_room(&self, room_id: &RoomId) -> Option<RoomSnapshot>;

    /// Ask the service to join a room the local user was invited to.
    ///
    /// May suspend indefinitely; timeout and retry policy belong to the
    /// client, not the controller.
    fn join_room(&self, room_id: &RoomId) -> impl Future<Output = Result<(), JoinRejected>> + Send;

    /// Subscribe to the live timeline feed.
    ///
    /// Returns `None` when no live connection is available, which is fatal
    /// to `attach`. Dropping the returned feed is the unsubscription.
    fn subscribe(&self) -> Option<TimelineFeed>;
}

/// Receiving half of a timeline subscription.
///
/// One feed is handed out per `subscribe` call; dropping it releases the
/// subscription, so each attach/detach pair subscribes and unsubscribes
/// exactly once.
pub struct TimelineFeed {
    rx: broadcast::Receiver<TimelineUpdate>,
}

impl TimelineFeed {
    /// Wrap a broadcast receiver obtained from the client.
    pub fn new(rx: broadcast::Receiver<TimelineUpdate>) -> Self {
        Self { rx }
    }

    /// Next update in delivery order. `None` once the client side is gone.
    ///
    /// A lagged receiver skips ahead to the oldest retained update rather
    /// than failing; the controller refetches full snapshots anyway.
    pub async fn next(&mut self) -> Option<TimelineUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "timeline feed lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
