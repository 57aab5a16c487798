//! Full-screen media viewer cursor.

use tracing::trace;

/// Keyboard input routed to the viewer while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    ArrowRight,
    ArrowLeft,
}

/// Which single media item, if any, is shown full-screen.
///
/// A plain two-state machine: closed, or open at a stable index into the
/// owning directory's loaded media. Stepping is bounded by the loaded list:
/// past either end the cursor holds position, it never wraps and never
/// triggers a batch load by itself.
#[derive(Debug, Default, Clone)]
pub struct MediaViewerCursor {
    current: Option<usize>,
}

impl MediaViewerCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Stable index of the displayed item, when open.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn open(&mut self, index: usize) {
        trace!("Viewer opened at index {}", index);
        self.current = Some(index);
    }

    pub fn close(&mut self) {
        if self.current.take().is_some() {
            trace!("Viewer closed");
        }
    }

    /// Steps to the next loaded item; a no-op at the last one.
    pub fn next(&mut self, loaded_len: usize) {
        if let Some(index) = self.current {
            if index + 1 < loaded_len {
                self.current = Some(index + 1);
            }
        }
    }

    /// Steps to the previous item; a no-op at index 0.
    pub fn previous(&mut self) {
        if let Some(index) = self.current {
            if index > 0 {
                self.current = Some(index - 1);
            }
        }
    }

    /// Applies a key binding. Only meaningful while open; the caller routes
    /// keys here exclusively in that state.
    pub fn handle_key(&mut self, key: ViewerKey, loaded_len: usize) {
        match key {
            ViewerKey::Escape => self.close(),
            ViewerKey::ArrowRight => self.next(loaded_len),
            ViewerKey::ArrowLeft => self.previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut viewer = MediaViewerCursor::new();
        assert!(!viewer.is_open());

        viewer.open(3);
        assert_eq!(viewer.current(), Some(3));

        viewer.close();
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_next_is_bounded() {
        let mut viewer = MediaViewerCursor::new();
        viewer.open(8);

        viewer.next(10);
        assert_eq!(viewer.current(), Some(9));
        // At the last loaded item: hold position, no wrap.
        viewer.next(10);
        assert_eq!(viewer.current(), Some(9));
    }

    #[test]
    fn test_previous_is_bounded() {
        let mut viewer = MediaViewerCursor::new();
        viewer.open(1);

        viewer.previous();
        assert_eq!(viewer.current(), Some(0));
        viewer.previous();
        assert_eq!(viewer.current(), Some(0));
    }

    #[test]
    fn test_stepping_while_closed_is_noop() {
        let mut viewer = MediaViewerCursor::new();
        viewer.next(10);
        viewer.previous();
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_key_bindings() {
        let mut viewer = MediaViewerCursor::new();
        viewer.open(0);

        viewer.handle_key(ViewerKey::ArrowRight, 3);
        assert_eq!(viewer.current(), Some(1));
        viewer.handle_key(ViewerKey::ArrowLeft, 3);
        assert_eq!(viewer.current(), Some(0));
        viewer.handle_key(ViewerKey::Escape, 3);
        assert!(!viewer.is_open());
    }
}
