use std::fmt;

use crate::models::MediaItem;

/// Canonical identifier for a folder path within the gallery root.
///
/// Built from ordered path segments with a stable `/` join: no leading or
/// trailing separator, the root directory is the empty string. Two cursors
/// holding identical segment sequences always produce the same key, which is
/// what makes the keyed store safe to share across navigation round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectoryKey(String);

impl DirectoryKey {
    /// The gallery root.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self(
            segments
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DirectoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Per-directory gallery state: one slot per [`DirectoryKey`] in the store.
#[derive(Debug, Clone, Default)]
pub struct DirectoryState {
    /// Immediate subfolder names, in backend order.
    /// `None` until the first folder-name fetch for this key lands.
    pub folder_names: Option<Vec<String>>,
    /// Media loaded so far, in display order. Append-only between resets.
    pub media: Vec<MediaItem>,
    /// A batch fetch for this directory is currently in flight.
    pub is_loading: bool,
    /// No further batches remain for this directory.
    pub exhausted: bool,
}

impl DirectoryState {
    /// Whether the half-open range `[start, stop)` is already fully covered
    /// by loaded media.
    pub fn covers(&self, start: usize, stop: usize) -> bool {
        start < self.media.len() && stop <= self.media.len()
    }
}
