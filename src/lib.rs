//! vitrine - incremental batch-loading and masonry-layout engine for media
//! gallery front-ends.
//!
//! The crate is the headless core of a folder-browsing image gallery: a
//! rendering shell feeds UI events in, and all gallery state lives here.
//!
//! - [`engine::GalleryEngine`] - the event dispatcher tying everything
//!   together
//! - [`gallery::GalleryStore`] - keyed per-directory state behind action
//!   dispatch
//! - [`gallery::BatchLoader`] - guarded, paginated media fetching
//! - [`layout::MasonryLayout`] - greedy column-balancing layout
//! - [`viewport::ViewportSentinel`] - near-bottom detection for infinite
//!   scroll
//! - [`bridge::MediaBridge`] - the asynchronous backend contract, with a
//!   filesystem reference implementation in [`bridge::fs`]
//!
//! The engine never blocks its input path: backend fetches run as detached
//! tokio tasks and completions surface on the engine's event channel.
//!
//! ```no_run
//! use vitrine::bridge::fs::FsBridge;
//! use vitrine::engine::{GalleryEngine, UiEvent};
//!
//! # async fn demo() {
//! let engine = GalleryEngine::new(FsBridge::new("/photos"));
//! let events = engine.subscribe();
//!
//! engine.start();
//! engine.handle_event(UiEvent::FolderClicked("vacations".into()));
//!
//! while let Ok(event) = events.recv_async().await {
//!     // re-render from engine.current_state() / engine.columns()
//!     let _ = event;
//! }
//! # }
//! ```

pub mod bridge;
pub mod engine;
pub mod gallery;
pub mod layout;
pub mod models;
pub mod sort;
pub mod viewport;

pub use bridge::{BridgeError, MediaBatch, MediaBridge};
pub use engine::{EngineConfig, GalleryEngine, UiEvent};
pub use gallery::{
    Action, BatchLoader, GalleryEvent, GalleryStore, LoaderConfig, MediaViewerCursor,
    NavigationCursor, ViewerKey,
};
pub use layout::{ColumnAssignment, MasonryLayout};
pub use models::{DirectoryKey, DirectoryState, MediaItem};
pub use viewport::ViewportSentinel;
