//! Core gallery state.
//!
//! This module provides:
//! - `GalleryStore` - keyed per-directory state behind action dispatch
//! - `BatchLoader` - guarded, paginated media fetching
//! - `NavigationCursor` - the current directory path
//! - `MediaViewerCursor` - the full-screen viewer state machine

pub mod loader;
pub mod navigation;
pub mod store;
pub mod viewer;

pub use loader::{BatchLoader, LoaderConfig, BATCH_SIZE, LOAD_COOLDOWN};
pub use navigation::{NavigationCursor, CLICK_LOCK_WINDOW};
pub use store::{Action, GalleryStore, DIRECTORY_CACHE_CAPACITY};
pub use viewer::{MediaViewerCursor, ViewerKey};

use crate::models::DirectoryKey;

/// Notifications emitted on the engine's event channel.
///
/// Fetches are fire-and-forget from the input path; their completions
/// surface here so an embedding shell knows when to re-render. Variants
/// carry the directory they belong to: a completion for a directory the
/// user has left is still delivered (and was applied to that key's slot).
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// The navigation cursor moved; `key` is now the active directory.
    DirectoryEntered { key: DirectoryKey },
    /// Subfolder names for `key` arrived.
    FolderNamesLoaded { key: DirectoryKey },
    /// A media batch for `key` was appended.
    MediaAppended {
        key: DirectoryKey,
        added: usize,
        total: usize,
    },
    /// No further batches remain for `key`.
    DirectoryExhausted { key: DirectoryKey },
    /// A batch fetch for `key` failed; the directory is idle again and a
    /// later trigger may retry.
    BatchFailed { key: DirectoryKey },
    /// The full-screen viewer opened at a stable media index.
    ViewerOpened { index: usize },
    /// The full-screen viewer closed.
    ViewerClosed,
}
