//! View effects.
//!
//! Instructions the controller produces for the host to execute after a
//! state change. The controller never touches the rendering surface itself.

/// An instruction for the view host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    /// Re-render from the current controller state.
    Render,
    /// Scroll the timeline viewport to the bottom.
    ScrollToBottom,
}
