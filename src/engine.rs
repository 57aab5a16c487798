//! Gallery engine: the explicit event dispatcher.
//!
//! Owns the navigation cursor, the keyed store, the batch loader, the
//! viewport sentinel and the viewer cursor, and translates UI input into
//! component calls. There is no implicit reactivity: a shell feeds
//! [`UiEvent`]s in, asynchronous completions come back as
//! [`GalleryEvent`]s on the engine's channel, and derived data (the masonry
//! column assignment) is recomputed on demand.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bridge::MediaBridge;
use crate::gallery::{
    Action, BatchLoader, GalleryEvent, GalleryStore, LoaderConfig, MediaViewerCursor,
    NavigationCursor, ViewerKey, CLICK_LOCK_WINDOW, DIRECTORY_CACHE_CAPACITY,
};
use crate::layout::{ColumnAssignment, MasonryLayout, COLUMNS, COLUMN_GAP};
use crate::models::{DirectoryKey, DirectoryState, MediaItem};
use crate::viewport::{ViewportSentinel, LOOKAHEAD_MARGIN};

/// UI input consumed by the engine.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A folder tile in the current directory was clicked.
    FolderClicked(String),
    /// Breadcrumb segment `index` was clicked: keep segments `0..=index`.
    BreadcrumbClicked(usize),
    /// The breadcrumb root was clicked.
    RootClicked,
    /// A media thumbnail was activated (click or enter).
    ThumbnailActivated(usize),
    /// A key went down. Routed to the viewer only while it is open.
    KeyPressed(ViewerKey),
    /// The scroll position or content extent changed, in pixels.
    ViewportChanged {
        scroll_top: f32,
        viewport_height: f32,
        content_height: f32,
    },
    /// The gallery container was resized to `width` pixels.
    ContainerResized { width: f32 },
}

/// Tunables for the engine and its components.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub loader: LoaderConfig,
    pub columns: usize,
    pub column_gap: f32,
    pub lookahead_margin: f32,
    pub click_lock_window: Duration,
    pub store_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            columns: COLUMNS,
            column_gap: COLUMN_GAP,
            lookahead_margin: LOOKAHEAD_MARGIN,
            click_lock_window: CLICK_LOCK_WINDOW,
            store_capacity: DIRECTORY_CACHE_CAPACITY,
        }
    }
}

/// The gallery core, generic over the backend bridge.
///
/// Methods that dispatch fetches must run within a tokio runtime; the input
/// path itself never awaits.
pub struct GalleryEngine<B> {
    bridge: Arc<B>,
    store: Arc<GalleryStore>,
    loader: BatchLoader<B>,
    navigation: Mutex<NavigationCursor>,
    viewer: Mutex<MediaViewerCursor>,
    sentinel: Mutex<ViewportSentinel>,
    layout: Mutex<MasonryLayout>,
    column_gap: f32,
    events: flume::Sender<GalleryEvent>,
    // Keeps the channel alive when no subscriber exists yet; never polled
    // by the engine itself.
    events_rx: flume::Receiver<GalleryEvent>,
}

impl<B: MediaBridge> GalleryEngine<B> {
    pub fn new(bridge: B) -> Self {
        Self::with_config(bridge, EngineConfig::default())
    }

    pub fn with_config(bridge: B, config: EngineConfig) -> Self {
        let bridge = Arc::new(bridge);
        let store = Arc::new(GalleryStore::with_capacity(config.store_capacity));
        let (events, events_rx) = flume::unbounded();
        let loader = BatchLoader::new(
            Arc::clone(&store),
            Arc::clone(&bridge),
            config.loader,
            events.clone(),
        );

        Self {
            bridge,
            store,
            loader,
            navigation: Mutex::new(NavigationCursor::with_lock_window(config.click_lock_window)),
            viewer: Mutex::new(MediaViewerCursor::new()),
            sentinel: Mutex::new(ViewportSentinel::with_margin(config.lookahead_margin)),
            layout: Mutex::new(MasonryLayout::new(config.columns)),
            column_gap: config.column_gap,
            events,
            events_rx,
        }
    }

    /// Enters the gallery root: fetches its folder names and kicks the
    /// first media batch. Call once after construction.
    pub fn start(&self) {
        self.enter_directory();
    }

    /// The event stream for asynchronous completions.
    ///
    /// Receivers share one queue; hand the returned receiver to a single
    /// consumer.
    pub fn subscribe(&self) -> flume::Receiver<GalleryEvent> {
        self.events_rx.clone()
    }

    /// Applies one UI event. Never blocks on the backend.
    pub fn handle_event(&self, event: UiEvent) {
        match event {
            UiEvent::FolderClicked(name) => {
                if self.navigation.lock().descend(&name) {
                    self.enter_directory();
                }
            }
            UiEvent::BreadcrumbClicked(index) => {
                if self.navigation.lock().truncate(index) {
                    self.enter_directory();
                }
            }
            UiEvent::RootClicked => {
                if self.navigation.lock().reset_root() {
                    self.enter_directory();
                }
            }
            UiEvent::ThumbnailActivated(index) => {
                let key = self.current_key();
                if index < self.store.media_len(&key) {
                    self.viewer.lock().open(index);
                    let _ = self.events.send(GalleryEvent::ViewerOpened { index });
                } else {
                    warn!("Thumbnail activation at {} outside loaded range of {}, ignored", index, key);
                }
            }
            UiEvent::KeyPressed(key) => self.handle_key(key),
            UiEvent::ViewportChanged {
                scroll_top,
                viewport_height,
                content_height,
            } => {
                let fired =
                    self.sentinel
                        .lock()
                        .update(scroll_top, viewport_height, content_height);
                if fired {
                    let key = self.current_key();
                    self.loader.request_next_batch(&key);
                }
            }
            UiEvent::ContainerResized { width } => {
                let mut layout = self.layout.lock();
                let column_width = layout.column_width_for(width, self.column_gap);
                layout.column_width = Some(column_width);
                debug!("Container resized to {}, column width {}", width, column_width);
            }
        }
    }

    /// Requests the next batch for the active directory, subject to the
    /// loader's guards. Exposed for shells that trigger loading outside the
    /// sentinel (e.g. an explicit "load more" affordance).
    pub fn request_next_batch(&self) -> Option<JoinHandle<()>> {
        let key = self.current_key();
        self.loader.request_next_batch(&key)
    }

    pub fn current_key(&self) -> DirectoryKey {
        self.navigation.lock().key()
    }

    pub fn current_segments(&self) -> Vec<String> {
        self.navigation.lock().segments().to_vec()
    }

    /// Snapshot of the active directory's state.
    pub fn current_state(&self) -> DirectoryState {
        self.store.state(&self.current_key())
    }

    /// Stable index of the media shown full-screen, when the viewer is open.
    pub fn viewer_index(&self) -> Option<usize> {
        self.viewer.lock().current()
    }

    /// The media item shown full-screen, when the viewer is open.
    pub fn viewed_media(&self) -> Option<MediaItem> {
        let index = self.viewer_index()?;
        self.current_state().media.get(index).cloned()
    }

    /// Recomputes the masonry assignment for the active directory's media.
    pub fn column_assignments(&self) -> ColumnAssignment {
        let state = self.current_state();
        self.layout.lock().assign_items(&state.media)
    }

    /// Item indices grouped per column, for rendering column by column.
    pub fn columns(&self) -> Vec<Vec<usize>> {
        let state = self.current_state();
        let layout = self.layout.lock();
        let assignment = layout.assign_items(&state.media);
        layout.into_columns(&assignment)
    }

    /// Shared handle to the keyed store.
    pub fn store(&self) -> &Arc<GalleryStore> {
        &self.store
    }

    /// Shared handle to the backend bridge.
    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    fn handle_key(&self, key: ViewerKey) {
        let mut viewer = self.viewer.lock();
        // Bindings are active only while a media item is open.
        if !viewer.is_open() {
            return;
        }

        let loaded_len = self.store.media_len(&self.current_key());
        viewer.handle_key(key, loaded_len);
        if !viewer.is_open() {
            let _ = self.events.send(GalleryEvent::ViewerClosed);
        }
    }

    /// Shared post-navigation sequence: invalidate the viewer, re-arm the
    /// sentinel and cooldown, refresh folder names when uncached, and kick
    /// an initial batch for a directory with nothing loaded yet.
    ///
    /// The in-flight flag is deliberately left alone: it is owned by the
    /// load guard and released when the fetch resolves, so a directory
    /// re-entered mid-fetch keeps its single-flight exclusion.
    fn enter_directory(&self) {
        let key = self.current_key();
        info!("Entering directory {}", key);

        {
            let mut viewer = self.viewer.lock();
            if viewer.is_open() {
                viewer.close();
                let _ = self.events.send(GalleryEvent::ViewerClosed);
            }
        }

        self.sentinel.lock().reset();
        self.loader.reset_cooldown(&key);
        let _ = self.events.send(GalleryEvent::DirectoryEntered { key: key.clone() });

        let state = self.store.state(&key);
        if state.folder_names.is_none() {
            self.spawn_folder_fetch(key.clone());
        }

        // Revisited directories keep their loaded media untouched; only a
        // directory with nothing loaded starts fetching.
        if state.media.is_empty() && !state.exhausted {
            self.loader.request_next_batch(&key);
        }
    }

    fn spawn_folder_fetch(&self, key: DirectoryKey) {
        debug!("Fetching folder names for {}", key);
        let bridge = Arc::clone(&self.bridge);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();

        tokio::spawn(async move {
            let names = match bridge.get_folder_names(key.as_str()).await {
                Ok(names) => names,
                Err(err) => {
                    // A failed listing reads as an empty directory; the slot
                    // still records the fetch so navigation does not loop.
                    warn!("Folder name fetch for {} failed: {}", key, err);
                    Vec::new()
                }
            };
            store.dispatch(Action::SetFolderNames {
                key: key.clone(),
                names,
            });
            let _ = events.send(GalleryEvent::FolderNamesLoaded { key });
        });
    }
}
