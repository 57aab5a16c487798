//! Navigation cursor: the ordered path segments of the current directory.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::DirectoryKey;

/// Window during which repeated folder descents collapse into one.
///
/// Implemented as a re-entrancy lock released after the window elapses, not
/// as event-level debouncing: the first genuine click always applies.
pub const CLICK_LOCK_WINDOW: Duration = Duration::from_millis(300);

/// The current directory as ordered path segments.
///
/// Mutations come from breadcrumb and folder clicks; every applied change is
/// reported back so the caller can close the viewer and refresh folder
/// names for the new key.
#[derive(Debug)]
pub struct NavigationCursor {
    segments: Vec<String>,
    lock_window: Duration,
    last_descent: Option<Instant>,
}

impl Default for NavigationCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationCursor {
    /// A cursor at the gallery root.
    pub fn new() -> Self {
        Self::with_lock_window(CLICK_LOCK_WINDOW)
    }

    pub fn with_lock_window(lock_window: Duration) -> Self {
        Self {
            segments: Vec::new(),
            lock_window,
            last_descent: None,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn key(&self) -> DirectoryKey {
        DirectoryKey::from_segments(&self.segments)
    }

    /// Replaces the whole path. Returns whether the cursor actually moved.
    pub fn set(&mut self, segments: Vec<String>) -> bool {
        if self.segments == segments {
            return false;
        }
        self.segments = segments;
        true
    }

    /// Back to the gallery root. Returns whether the cursor actually moved.
    pub fn reset_root(&mut self) -> bool {
        self.set(Vec::new())
    }

    /// Breadcrumb truncation: keep segments `0..=index`. Returns whether
    /// the cursor actually moved.
    pub fn truncate(&mut self, index: usize) -> bool {
        if index + 1 >= self.segments.len() {
            return false;
        }
        self.segments.truncate(index + 1);
        true
    }

    /// Folder descent: append `name`, unless another descent applied within
    /// the click-lock window. Returns whether the descent applied.
    pub fn descend(&mut self, name: &str) -> bool {
        if let Some(at) = self.last_descent {
            if at.elapsed() < self.lock_window {
                debug!("Descent into {:?} ignored, click lock held", name);
                return false;
            }
        }

        self.last_descent = Some(Instant::now());
        self.segments.push(name.to_string());
        true
    }
}
