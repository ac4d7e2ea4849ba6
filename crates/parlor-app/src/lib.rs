//! Room timeline controller.
//!
//! Keeps a renderable snapshot of one room synchronized with a live timeline
//! feed and manages the join workflow for rooms the local user has been
//! invited to.
//!
//! # Architecture
//!
//! The controller is a state machine decoupled from I/O. It consumes timeline
//! updates, scroll probes, and user intents, and produces [`ViewEffect`]
//! instructions for the host to execute. The two collaborators it talks to
//! are seams, not concrete types:
//!
//! - [`MessagingClient`]: the shared live connection, injected at
//!   construction. The controller only reads snapshots from it and issues
//!   the join command; it never mutates client-internal room state.
//! - [`ViewHost`]: the rendering surface, which reads [`ControllerState`]
//!   and supplies [`parlor_core::ScrollProbe`] values after each paint.
//!
//! [`TimelineRuntime`] wires the three together into a single-threaded,
//! event-driven loop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod controller;
mod effect;
mod error;
mod host;
mod runtime;
mod state;

pub use client::{MessagingClient, TimelineFeed, TimelineUpdate};
pub use controller::{ControllerConfig, JoinTicket, RoomTimelineController};
pub use effect::ViewEffect;
pub use error::{AttachError, JoinRejected};
pub use host::{HostIntent, ViewHost};
pub use runtime::{RuntimeError, TimelineRuntime};
pub use state::{ControllerState, MembershipPhase};
