//! Room timeline controller state machine.
//!
//! One controller instance tracks one room at a time. Per attached room the
//! lifecycle is `Invited -> Joining -> Joined`, with a failed join dropping
//! back to `Invited` with the error stored for display. Re-attaching (to the
//! same or a different room) restarts the machine.
//!
//! All entry points are synchronous with respect to controller state; the
//! only suspension point in the system is the client's join call, which the
//! runtime awaits on the controller's behalf and reports back through
//! [`RoomTimelineController::resolve_join`].

use std::sync::Arc;

use parlor_core::{RoomId, ScrollProbe};

use crate::{
    client::{MessagingClient, TimelineFeed, TimelineUpdate},
    effect::ViewEffect,
    error::{AttachError, JoinRejected},
    state::{ControllerState, MembershipPhase},
};

/// Controller behavior knobs.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Scroll to the bottom once on initial attach, regardless of prior
    /// viewport position. A host restoring a saved scroll position turns
    /// this off.
    pub scroll_on_attach: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { scroll_on_attach: true }
    }
}

/// Proof that a join attempt was admitted by the controller.
///
/// The runtime executes the asynchronous join and returns the ticket with
/// the outcome; a ticket from before a detach or re-attach no longer
/// matches and its result is discarded.
#[derive(Debug, Clone)]
pub struct JoinTicket {
    room_id: RoomId,
    generation: u64,
}

impl JoinTicket {
    /// Room this ticket joins.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }
}

/// State machine synchronizing one room's snapshot with its live feed.
pub struct RoomTimelineController<C> {
    client: Arc<C>,
    config: ControllerConfig,
    bound: Option<RoomId>,
    state: ControllerState,
    // Bumped on every detach and admitted join; stale join results carry an
    // older value and are ignored.
    generation: u64,
}

impl<C: MessagingClient> RoomTimelineController<C> {
    /// Create a detached controller over a shared client handle.
    pub fn new(client: Arc<C>, config: ControllerConfig) -> Self {
        Self { client, config, bound: None, state: ControllerState::default(), generation: 0 }
    }

    /// Render-ready state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Room this controller is bound to. `None` while detached.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.bound.as_ref()
    }

    /// Bind to a room: subscribe to the live feed and fetch the initial
    /// snapshot.
    ///
    /// Subscribes before fetching, so a failed fetch drops the feed again
    /// and leaves no registration behind. An already-attached controller is
    /// detached first.
    ///
    /// # Errors
    ///
    /// [`AttachError::SubscriptionUnavailable`] when the client has no live
    /// connection, [`AttachError::RoomNotFound`] when the room id is unknown
    /// to it.
    pub fn attach(
        &mut self,
        room_id: RoomId,
    ) -> Result<(TimelineFeed, Vec<ViewEffect>), AttachError> {
        if self.bound.is_some() {
            self.detach();
        }

        let feed = self.client.subscribe().ok_or(AttachError::SubscriptionUnavailable)?;
        let snapshot = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| AttachError::RoomNotFound(room_id.clone()))?;

        tracing::debug!(room = %room_id, membership = snapshot.membership.as_str(), "attached");
        self.bound = Some(room_id);
        self.state = ControllerState { room: Some(snapshot), ..ControllerState::default() };

        let mut effects = vec![ViewEffect::Render];
        if self.config.scroll_on_attach {
            effects.push(ViewEffect::ScrollToBottom);
        }
        Ok((feed, effects))
    }

    /// Unbind from the room and discard controller state.
    ///
    /// Idempotent, and safe to call even if `attach` never succeeded. Any
    /// callback arriving after this point is a no-op; a join already in
    /// flight completes in the client but its result is discarded.
    pub fn detach(&mut self) {
        self.bound = None;
        self.state = ControllerState::default();
        self.generation += 1;
    }

    /// Ask to join the room the local user was invited to.
    ///
    /// Valid only in the invited phase. Returns the ticket the runtime needs
    /// to execute the join; `None` when the request is not admissible,
    /// including the duplicate-submission case while a join is already in
    /// flight.
    pub fn request_join(&mut self) -> Option<JoinTicket> {
        let room_id = self.bound.as_ref()?;
        match self.state.phase() {
            MembershipPhase::Invited => {},
            MembershipPhase::Joining => {
                tracing::debug!(room = %room_id, "join already in flight, ignoring duplicate");
                return None;
            },
            phase => {
                tracing::debug!(room = %room_id, ?phase, "join requested outside invite phase");
                return None;
            },
        }

        self.state.joining = true;
        self.state.join_error = None;
        self.generation += 1;
        Some(JoinTicket { room_id: room_id.clone(), generation: self.generation })
    }

    /// Report the outcome of the asynchronous join for `ticket`.
    ///
    /// A ticket invalidated by detach or re-attach is discarded without
    /// touching state. On success the snapshot is refetched immediately so
    /// the invite prompt does not linger until the next timeline event.
    pub fn resolve_join(
        &mut self,
        ticket: &JoinTicket,
        result: Result<(), JoinRejected>,
    ) -> Vec<ViewEffect> {
        if ticket.generation != self.generation || self.bound.as_ref() != Some(&ticket.room_id) {
            tracing::warn!(room = %ticket.room_id, "discarding stale join result");
            return Vec::new();
        }

        self.state.joining = false;
        match result {
            Ok(()) => {
                self.state.join_error = None;
                if let Some(snapshot) = self.client.get_room(&ticket.room_id) {
                    self.state.room = Some(snapshot);
                }
            },
            Err(rejection) => {
                tracing::warn!(room = %ticket.room_id, code = %rejection.code, "join failed");
                self.state.join_error = Some(rejection);
            },
        }
        vec![ViewEffect::Render]
    }

    /// Process one update from the live feed.
    ///
    /// Updates for any other room are filtered out before state is touched.
    /// For the bound room the snapshot is replaced with a fresh fetch;
    /// `probe` is the viewport state captured before this update renders and
    /// decides whether a [`ViewEffect::ScrollToBottom`] is emitted.
    pub fn handle_update(
        &mut self,
        update: &TimelineUpdate,
        probe: Option<ScrollProbe>,
    ) -> Vec<ViewEffect> {
        let Some(room_id) = self.bound.clone() else {
            tracing::debug!(room = %update.room_id, "timeline update after detach, ignoring");
            return Vec::new();
        };
        if update.room_id != room_id {
            return Vec::new();
        }

        if let Some(probe) = probe {
            self.state.at_bottom = probe.at_bottom();
        }
        let was_at_bottom = self.state.at_bottom;

        match self.client.get_room(&room_id) {
            Some(snapshot) => self.state.room = Some(snapshot),
            None => {
                tracing::warn!(room = %room_id, "bound room no longer available");
                self.state.room = None;
            },
        }

        let mut effects = vec![ViewEffect::Render];
        if was_at_bottom && !update.prepended && self.state.room.is_some() {
            effects.push(ViewEffect::ScrollToBottom);
        }
        effects
    }

    /// Record viewport metrics reported by the host after a paint.
    ///
    /// Passive: feeds the next auto-scroll decision, triggers nothing.
    pub fn on_scroll_probe(&mut self, probe: ScrollProbe) {
        if self.bound.is_none() {
            return;
        }
        self.state.at_bottom = probe.at_bottom();
    }
}
