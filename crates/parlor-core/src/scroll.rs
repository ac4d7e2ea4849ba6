//! Viewport scroll probes.

use serde::{Deserialize, Serialize};

/// Scroll metrics captured by the view host after a paint.
///
/// The controller never reaches into rendering internals; the host hands it
/// these plain pixel values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollProbe {
    /// Distance scrolled from the top of the content, in pixels.
    pub scroll_top: u32,
    /// Total content height, in pixels.
    pub content_height: u32,
    /// Visible viewport height, in pixels.
    pub viewport_height: u32,
}

impl ScrollProbe {
    /// Create a probe from raw pixel metrics.
    pub fn new(scroll_top: u32, content_height: u32, viewport_height: u32) -> Self {
        Self { scroll_top, content_height, viewport_height }
    }

    /// Whether the viewport is scrolled to the bottom of the content.
    ///
    /// True when the unscrolled remainder fits within the viewport, which
    /// includes content shorter than the viewport itself.
    pub fn at_bottom(self) -> bool {
        self.content_height.saturating_sub(self.scroll_top) <= self.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn exact_bottom_is_at_bottom() {
        assert!(ScrollProbe::new(400, 1000, 600).at_bottom());
    }

    #[test]
    fn scrolled_up_is_not_at_bottom() {
        assert!(!ScrollProbe::new(399, 1000, 600).at_bottom());
        assert!(!ScrollProbe::new(0, 1000, 600).at_bottom());
    }

    #[test]
    fn short_content_is_always_at_bottom() {
        assert!(ScrollProbe::new(0, 300, 600).at_bottom());
    }

    proptest! {
        #[test]
        fn scrolling_down_never_leaves_bottom(
            content in 0u32..100_000,
            viewport in 1u32..10_000,
            extra in 0u32..10_000,
        ) {
            // Once a probe reports at-bottom, a larger scroll offset for the
            // same geometry must still report at-bottom.
            let base = content.saturating_sub(viewport);
            prop_assert!(ScrollProbe::new(base, content, viewport).at_bottom());
            prop_assert!(ScrollProbe::new(base.saturating_add(extra), content, viewport).at_bottom());
        }
    }
}
