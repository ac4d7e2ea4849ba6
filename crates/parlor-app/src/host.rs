//! View host seam.
//!
//! The [`ViewHost`] trait decouples the controller and runtime from any
//! concrete rendering surface. A browser-backed host paints DOM, the test
//! harness records calls; the runtime only sees this trait.

use std::future::Future;

use parlor_core::ScrollProbe;

use crate::state::ControllerState;

/// User interactions and viewport reports flowing from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostIntent {
    /// The user asked to join the room they were invited to.
    JoinRequested,
    /// Viewport metrics measured after a paint.
    Probe(ScrollProbe),
    /// The view is going away; detach the controller.
    Detach,
}

/// Rendering surface driven by the runtime.
pub trait ViewHost {
    /// Host-specific rendering error type.
    type Error: std::error::Error + Send + 'static;

    /// Paint the given controller state.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be painted; this is fatal to
    /// the runtime loop.
    fn render(&mut self, state: &ControllerState) -> Result<(), Self::Error>;

    /// Scroll the timeline viewport to the bottom.
    fn scroll_to_bottom(&mut self);

    /// Current viewport metrics. `None` when no timeline is laid out (for
    /// example while the invite prompt is shown).
    fn scroll_probe(&self) -> Option<ScrollProbe>;

    /// Wait for the next user intent. `None` when the host is closing,
    /// which the runtime treats as a detach.
    fn poll_intent(&mut self) -> impl Future<Output = Option<HostIntent>> + Send;
}
