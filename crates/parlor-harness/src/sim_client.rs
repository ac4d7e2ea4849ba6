//! Scriptable in-memory messaging client.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use parlor_app::{JoinRejected, MessagingClient, TimelineFeed, TimelineUpdate};
use parlor_core::{Membership, RoomId, RoomSnapshot, TimelineEvent, UserId};
use tokio::sync::{broadcast, oneshot};

/// Scripted outcome for a join request.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// Accept immediately: membership flips to joined and a membership
    /// event is delivered on the feed.
    Accept,
    /// Reject immediately with the given protocol error code.
    Reject(String),
    /// Stay pending until [`SimClient::release_join`] is called.
    Hold,
}

struct Directory {
    rooms: HashMap<RoomId, RoomSnapshot>,
    join_behavior: HashMap<RoomId, JoinOutcome>,
    held_joins: HashMap<RoomId, Vec<oneshot::Sender<Result<(), JoinRejected>>>>,
    live: bool,
    next_event: u64,
}

/// In-memory [`MessagingClient`] with a broadcast timeline feed.
///
/// Shared across controllers the way a real live connection is: wrap it in
/// an `Arc` and hand out clones of the handle.
pub struct SimClient {
    dir: Mutex<Directory>,
    feed_tx: broadcast::Sender<TimelineUpdate>,
    join_calls: AtomicUsize,
    local_user: UserId,
}

impl Default for SimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClient {
    /// Create a live client with an empty room directory.
    pub fn new() -> Self {
        let (feed_tx, _) = broadcast::channel(64);
        Self {
            dir: Mutex::new(Directory {
                rooms: HashMap::new(),
                join_behavior: HashMap::new(),
                held_joins: HashMap::new(),
                live: true,
                next_event: 0,
            }),
            feed_tx,
            join_calls: AtomicUsize::new(0),
            local_user: UserId::from("@local:example.org"),
        }
    }

    /// The local user this client acts as.
    pub fn local_user(&self) -> &UserId {
        &self.local_user
    }

    /// Simulate the live connection coming or going. While not live,
    /// `subscribe` fails.
    pub fn set_live(&self, live: bool) {
        self.lock().live = live;
    }

    /// Put a room snapshot into the directory, replacing any previous one.
    pub fn insert_room(&self, snapshot: RoomSnapshot) {
        self.lock().rooms.insert(snapshot.room_id.clone(), snapshot);
    }

    /// Remove a room from the directory, as if it became unavailable.
    pub fn remove_room(&self, room_id: &RoomId) {
        self.lock().rooms.remove(room_id);
    }

    /// Append a live event to a room and deliver it on the feed.
    pub fn push_event(&self, room_id: &RoomId, event: TimelineEvent) {
        {
            let mut dir = self.lock();
            if let Some(room) = dir.rooms.get_mut(room_id) {
                room.timeline.push(event.clone());
            }
        }
        self.broadcast(room_id, event, false);
    }

    /// Prepend a back-paginated event to a room and deliver it on the feed.
    pub fn prepend_event(&self, room_id: &RoomId, event: TimelineEvent) {
        {
            let mut dir = self.lock();
            if let Some(room) = dir.rooms.get_mut(room_id) {
                room.timeline.insert(0, event.clone());
            }
        }
        self.broadcast(room_id, event, true);
    }

    /// Script the outcome of subsequent join requests for a room.
    pub fn script_join(&self, room_id: &RoomId, outcome: JoinOutcome) {
        self.lock().join_behavior.insert(room_id.clone(), outcome);
    }

    /// Resolve joins held by [`JoinOutcome::Hold`].
    ///
    /// On `Ok` the membership flips to joined before the result is
    /// delivered, as it would when the server acknowledges.
    pub fn release_join(&self, room_id: &RoomId, result: Result<(), JoinRejected>) {
        let (senders, event) = {
            let mut dir = self.lock();
            let senders = dir.held_joins.remove(room_id).unwrap_or_default();
            if senders.is_empty() {
                tracing::warn!(room = %room_id, "release_join without a held join");
            }
            let event = match result {
                Ok(()) => self.apply_accept(&mut dir, room_id),
                Err(_) => None,
            };
            (senders, event)
        };
        if let Some(event) = event {
            self.broadcast(room_id, event, false);
        }
        for sender in senders {
            let _ = sender.send(result.clone());
        }
    }

    /// Number of join invocations the client has seen.
    pub fn join_calls(&self) -> usize {
        self.join_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.dir.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn broadcast(&self, room_id: &RoomId, event: TimelineEvent, prepended: bool) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.feed_tx.send(TimelineUpdate { room_id: room_id.clone(), event, prepended });
    }

    /// Flip membership to joined and synthesize the membership event.
    fn apply_accept(&self, dir: &mut Directory, room_id: &RoomId) -> Option<TimelineEvent> {
        let seq = dir.next_event;
        dir.next_event += 1;
        let room = dir.rooms.get_mut(room_id)?;
        room.membership = Membership::Join;
        room.inviter = None;
        let event = TimelineEvent::new(
            format!("$sim-{seq}"),
            self.local_user.clone(),
            format!("{} joined", self.local_user),
            seq,
        );
        room.timeline.push(event.clone());
        Some(event)
    }
}

impl MessagingClient for SimClient {
    fn get_room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        self.lock().rooms.get(room_id).cloned()
    }

    fn join_room(&self, room_id: &RoomId) -> impl Future<Output = Result<(), JoinRejected>> + Send {
        self.join_calls.fetch_add(1, Ordering::SeqCst);
        let room_id = room_id.clone();
        async move {
            enum Wait {
                Done(Result<(), JoinRejected>),
                Held(oneshot::Receiver<Result<(), JoinRejected>>),
            }

            let (wait, event) = {
                let mut dir = self.lock();
                let outcome =
                    dir.join_behavior.get(&room_id).cloned().unwrap_or(JoinOutcome::Accept);
                match outcome {
                    JoinOutcome::Accept => match self.apply_accept(&mut dir, &room_id) {
                        Some(event) => (Wait::Done(Ok(())), Some(event)),
                        None => (Wait::Done(Err(JoinRejected::new("M_NOT_FOUND"))), None),
                    },
                    JoinOutcome::Reject(code) => (Wait::Done(Err(JoinRejected::new(code))), None),
                    JoinOutcome::Hold => {
                        let (tx, rx) = oneshot::channel();
                        dir.held_joins.entry(room_id.clone()).or_default().push(tx);
                        (Wait::Held(rx), None)
                    },
                }
            };

            if let Some(event) = event {
                self.broadcast(&room_id, event, false);
            }
            match wait {
                Wait::Done(result) => result,
                Wait::Held(rx) => {
                    rx.await.unwrap_or_else(|_| Err(JoinRejected::new("M_UNKNOWN")))
                },
            }
        }
    }

    fn subscribe(&self) -> Option<TimelineFeed> {
        self.lock().live.then(|| TimelineFeed::new(self.feed_tx.subscribe()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn invited(id: &str) -> RoomSnapshot {
        RoomSnapshot::new(id, Membership::Invite).with_inviter("@inviter:example.org")
    }

    #[tokio::test]
    async fn accept_flips_membership_and_delivers_event() {
        let client = SimClient::new();
        let room_id = RoomId::from("!r:example.org");
        client.insert_room(invited("!r:example.org"));
        let mut feed = client.subscribe().expect("feed");

        client.join_room(&room_id).await.expect("join");

        let room = client.get_room(&room_id).expect("room");
        assert_eq!(room.membership, Membership::Join);
        assert!(room.inviter.is_none());

        let update = feed.next().await.expect("update");
        assert_eq!(update.room_id, room_id);
        assert!(update.event.body.ends_with("joined"));
    }

    #[tokio::test]
    async fn scripted_reject_carries_code() {
        let client = SimClient::new();
        let room_id = RoomId::from("!r:example.org");
        client.insert_room(invited("!r:example.org"));
        client.script_join(&room_id, JoinOutcome::Reject("M_FORBIDDEN".into()));

        let err = client.join_room(&room_id).await.err().expect("rejected");
        assert_eq!(err.code, "M_FORBIDDEN");
        assert_eq!(client.join_calls(), 1);
    }

    #[tokio::test]
    async fn held_join_waits_for_release() {
        let client = std::sync::Arc::new(SimClient::new());
        let room_id = RoomId::from("!r:example.org");
        client.insert_room(invited("!r:example.org"));
        client.script_join(&room_id, JoinOutcome::Hold);

        let join = {
            let client = std::sync::Arc::clone(&client);
            let room_id = room_id.clone();
            tokio::spawn(async move { client.join_room(&room_id).await })
        };

        // Yield so the join registers itself before release.
        tokio::task::yield_now().await;
        client.release_join(&room_id, Ok(()));

        join.await.expect("task").expect("join ok");
        assert_eq!(client.get_room(&room_id).expect("room").membership, Membership::Join);
    }

    #[test]
    fn offline_client_refuses_subscription() {
        let client = SimClient::new();
        client.set_live(false);
        assert!(client.subscribe().is_none());
    }
}
