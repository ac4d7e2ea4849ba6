//! Single-threaded orchestration loop.
//!
//! [`TimelineRuntime`] owns the controller, the view host, and the timeline
//! feed, and multiplexes the three callback sources the controller reacts
//! to: feed updates, host intents, and at most one pending join future. All
//! controller logic runs on one logical task; the join call is the only
//! suspension point.

use std::{future::Future, pin::Pin, sync::Arc};

use parlor_core::RoomId;
use thiserror::Error;

use crate::{
    client::{MessagingClient, TimelineUpdate},
    controller::{ControllerConfig, JoinTicket, RoomTimelineController},
    effect::ViewEffect,
    error::{AttachError, JoinRejected},
    host::{HostIntent, ViewHost},
};

/// Fatal runtime failures.
#[derive(Debug, Error)]
pub enum RuntimeError<E: std::error::Error> {
    /// Attaching to the room failed.
    #[error("failed to attach: {0}")]
    Attach(#[from] AttachError),

    /// The view host failed to render.
    #[error("view host failed: {0}")]
    Host(E),
}

type JoinFuture = Pin<Box<dyn Future<Output = Result<(), JoinRejected>> + Send>>;

enum Step {
    Update(Option<TimelineUpdate>),
    Intent(Option<HostIntent>),
    JoinResolved(Result<(), JoinRejected>),
}

/// Event loop binding one controller to one host.
pub struct TimelineRuntime<C, H> {
    client: Arc<C>,
    controller: RoomTimelineController<C>,
    host: H,
}

impl<C, H> TimelineRuntime<C, H>
where
    C: MessagingClient + Send + Sync + 'static,
    H: ViewHost,
{
    /// Create a runtime over a shared client handle and a host.
    pub fn new(client: Arc<C>, host: H, config: ControllerConfig) -> Self {
        let controller = RoomTimelineController::new(Arc::clone(&client), config);
        Self { client, controller, host }
    }

    /// The controller's current state machine.
    pub fn controller(&self) -> &RoomTimelineController<C> {
        &self.controller
    }

    /// Attach to `room_id` and process callbacks until the host detaches or
    /// the feed closes.
    ///
    /// # Errors
    ///
    /// Propagates attach failures and host render failures; everything else
    /// (join rejections, foreign events, stale results) is absorbed into
    /// controller state.
    pub async fn run(mut self, room_id: RoomId) -> Result<(), RuntimeError<H::Error>> {
        let (mut feed, effects) = self.controller.attach(room_id)?;
        self.apply(effects)?;

        let mut pending_join: Option<(JoinTicket, JoinFuture)> = None;

        loop {
            let step = if let Some((_, join)) = pending_join.as_mut() {
                tokio::select! {
                    result = join.as_mut() => Step::JoinResolved(result),
                    update = feed.next() => Step::Update(update),
                    intent = self.host.poll_intent() => Step::Intent(intent),
                }
            } else {
                tokio::select! {
                    update = feed.next() => Step::Update(update),
                    intent = self.host.poll_intent() => Step::Intent(intent),
                }
            };

            match step {
                Step::Update(Some(update)) => {
                    // Viewport state is captured before the snapshot swap so
                    // the auto-scroll decision reflects what the user saw.
                    let probe = self.host.scroll_probe();
                    let effects = self.controller.handle_update(&update, probe);
                    self.apply(effects)?;
                },
                Step::Update(None) => {
                    tracing::warn!("timeline feed closed, detaching");
                    self.controller.detach();
                    return Ok(());
                },
                Step::Intent(Some(HostIntent::JoinRequested)) => {
                    if let Some(ticket) = self.controller.request_join() {
                        let client = Arc::clone(&self.client);
                        let room = ticket.room_id().clone();
                        let join: JoinFuture =
                            Box::pin(async move { client.join_room(&room).await });
                        pending_join = Some((ticket, join));
                        self.apply(vec![ViewEffect::Render])?;
                    }
                },
                Step::Intent(Some(HostIntent::Probe(probe))) => {
                    self.controller.on_scroll_probe(probe);
                },
                Step::Intent(Some(HostIntent::Detach) | None) => {
                    // Dropping the feed releases the subscription; a join
                    // still in flight is dropped with it and its result
                    // discarded.
                    self.controller.detach();
                    return Ok(());
                },
                Step::JoinResolved(result) => {
                    if let Some((ticket, _)) = pending_join.take() {
                        let effects = self.controller.resolve_join(&ticket, result);
                        self.apply(effects)?;
                    }
                },
            }
        }
    }

    fn apply(&mut self, effects: Vec<ViewEffect>) -> Result<(), RuntimeError<H::Error>> {
        for effect in effects {
            match effect {
                ViewEffect::Render => {
                    self.host.render(self.controller.state()).map_err(RuntimeError::Host)?;
                },
                ViewEffect::ScrollToBottom => self.host.scroll_to_bottom(),
            }
        }
        Ok(())
    }
}
