//! Near-bottom detection for infinite scrolling.
//!
//! The sentinel watches the trailing edge of rendered content and reports
//! when it enters a lookahead window above the physical bottom, so the next
//! batch is requested before the user actually reaches it.

use tracing::trace;

/// Default lookahead margin in pixels: the signal fires this far before the
/// content bottom becomes visible.
pub const LOOKAHEAD_MARGIN: f32 = 200.0;

/// Edge-triggered near-bottom detector.
///
/// [`ViewportSentinel::update`] returns `true` only on the transition into
/// the near-bottom region; remaining inside the region does not re-signal.
/// Suppression while a batch is already in flight is the loader's own guard,
/// not the sentinel's.
#[derive(Debug, Clone)]
pub struct ViewportSentinel {
    lookahead_margin: f32,
    near_bottom: bool,
}

impl Default for ViewportSentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportSentinel {
    pub fn new() -> Self {
        Self::with_margin(LOOKAHEAD_MARGIN)
    }

    pub fn with_margin(lookahead_margin: f32) -> Self {
        Self {
            lookahead_margin,
            near_bottom: false,
        }
    }

    pub fn is_near_bottom(&self) -> bool {
        self.near_bottom
    }

    /// Feeds a scroll/resize observation. Returns `true` when the trailing
    /// edge just entered the lookahead window.
    ///
    /// Content shorter than the viewport counts as near-bottom, so an empty
    /// or short directory still produces one signal.
    pub fn update(&mut self, scroll_top: f32, viewport_height: f32, content_height: f32) -> bool {
        let near = scroll_top + viewport_height + self.lookahead_margin >= content_height;
        let fired = near && !self.near_bottom;
        self.near_bottom = near;

        if fired {
            trace!(
                "Viewport sentinel fired at scroll_top={} viewport_height={} content_height={}",
                scroll_top,
                viewport_height,
                content_height
            );
        }
        fired
    }

    /// Re-arms the sentinel, e.g. after appended content pushed the bottom
    /// away or after navigating to another directory.
    pub fn reset(&mut self) {
        self.near_bottom = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_entering_margin() {
        let mut sentinel = ViewportSentinel::with_margin(200.0);

        assert!(!sentinel.update(0.0, 600.0, 2000.0));
        assert!(!sentinel.update(1000.0, 600.0, 2000.0));
        // 1300 + 600 + 200 >= 2000: entering the window.
        assert!(sentinel.update(1300.0, 600.0, 2000.0));
    }

    #[test]
    fn test_does_not_refire_while_inside_region() {
        let mut sentinel = ViewportSentinel::with_margin(200.0);

        assert!(sentinel.update(1300.0, 600.0, 2000.0));
        assert!(!sentinel.update(1350.0, 600.0, 2000.0));
        assert!(!sentinel.update(1400.0, 600.0, 2000.0));
    }

    #[test]
    fn test_rearms_after_leaving_region() {
        let mut sentinel = ViewportSentinel::with_margin(200.0);

        assert!(sentinel.update(1300.0, 600.0, 2000.0));
        // Content grew: trailing edge far away again.
        assert!(!sentinel.update(1300.0, 600.0, 4000.0));
        assert!(sentinel.update(3300.0, 600.0, 4000.0));
    }

    #[test]
    fn test_short_content_counts_as_near_bottom() {
        let mut sentinel = ViewportSentinel::new();
        assert!(sentinel.update(0.0, 600.0, 100.0));
        assert!(sentinel.is_near_bottom());
    }

    #[test]
    fn test_reset_rearms() {
        let mut sentinel = ViewportSentinel::with_margin(200.0);
        assert!(sentinel.update(1300.0, 600.0, 2000.0));
        sentinel.reset();
        assert!(sentinel.update(1300.0, 600.0, 2000.0));
    }
}
