//! Deterministic test harness for the Parlor controller.
//!
//! In-process implementations of the controller's two collaborator seams:
//!
//! - [`SimClient`]: a scriptable [`parlor_app::MessagingClient`] with an
//!   in-memory room directory and a broadcast timeline feed. Join outcomes
//!   can be scripted to accept, reject, or stay pending until released, so
//!   in-flight races are reproducible.
//! - [`SimHost`]: a recording [`parlor_app::ViewHost`] fed with scripted
//!   intents and probe values; tests inspect what was rendered and how often
//!   the viewport was scrolled.
//!
//! The same controller and runtime code runs against these fakes as against
//! a real connection and surface.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod render;
mod sim_client;
mod sim_host;

pub use render::render_lines;
pub use sim_client::{JoinOutcome, SimClient};
pub use sim_host::{Recording, SimHost, SimHostHandle};
