//! Incremental batch loader.
//!
//! Issues paginated media fetches for a directory key and applies the
//! results back into the store. Three guards damp redundant work:
//! - at most one fetch per key in flight (store-level check-then-set),
//! - a per-key cooldown between dispatched requests,
//! - a pre-dispatch skip of ranges the store already covers.
//!
//! Fetch failures are logged and swallowed; the directory returns to a
//! non-loading state and the next trigger retries the same range.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::bridge::MediaBridge;
use crate::gallery::store::{Action, GalleryStore};
use crate::gallery::GalleryEvent;
use crate::models::DirectoryKey;
use crate::sort::natural_cmp;

/// Items per batch. A multiple of the default column count, so the first
/// screenful distributes evenly across the masonry grid.
pub const BATCH_SIZE: usize = 30;

/// Minimum interval between dispatched requests for one directory.
pub const LOAD_COOLDOWN: Duration = Duration::from_millis(2000);

/// Tunables for the batch loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub batch_size: usize,
    /// Damps duplicate triggers from overlapping scroll and resize events.
    pub cooldown: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            cooldown: LOAD_COOLDOWN,
        }
    }
}

/// Paginated media loader for the keyed directory store.
pub struct BatchLoader<B> {
    store: Arc<GalleryStore>,
    bridge: Arc<B>,
    config: LoaderConfig,
    events: flume::Sender<GalleryEvent>,
    last_dispatch: Mutex<HashMap<DirectoryKey, Instant>>,
}

impl<B: MediaBridge> BatchLoader<B> {
    pub fn new(
        store: Arc<GalleryStore>,
        bridge: Arc<B>,
        config: LoaderConfig,
        events: flume::Sender<GalleryEvent>,
    ) -> Self {
        Self {
            store,
            bridge,
            config,
            events,
            last_dispatch: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Requests the next batch for `key`.
    ///
    /// Returns the handle of the spawned fetch task, or `None` when the call
    /// was a no-op: a fetch already in flight, the directory exhausted, the
    /// cooldown window still open, or the requested range already covered by
    /// loaded media. Callers driving a UI can drop the handle; tests await
    /// it for determinism.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_next_batch(&self, key: &DirectoryKey) -> Option<JoinHandle<()>> {
        if !self.cooldown_elapsed(key) {
            trace!("Batch request for {} inside cooldown window, ignored", key);
            return None;
        }

        let snapshot = self.store.state(key);
        if snapshot.is_loading {
            trace!("Batch request for {} ignored, fetch already in flight", key);
            return None;
        }
        if snapshot.exhausted {
            trace!("Batch request for {} ignored, directory exhausted", key);
            return None;
        }

        let start = snapshot.media.len();
        let stop = start + self.config.batch_size;
        if self.store.is_batch_loaded(key, start, stop) {
            debug!("Stale duplicate trigger for {} [{}, {}), range already loaded", key, start, stop);
            return None;
        }

        // Re-validated under the store lock; a concurrent trigger that won
        // the race leaves us with nothing to do.
        let range = self.store.try_begin_load(key, self.config.batch_size)?;
        self.touch_cooldown(key);
        debug!("Dispatching media batch fetch for {} [{}, {})", key, range.start, range.end);

        let store = Arc::clone(&self.store);
        let bridge = Arc::clone(&self.bridge);
        let events = self.events.clone();
        let key = key.clone();
        Some(tokio::spawn(async move {
            fetch_and_apply(store, bridge, events, key, range).await;
        }))
    }

    /// Re-arms the cooldown for a key, so navigation can trigger an
    /// immediate first fetch for the entered directory.
    pub fn reset_cooldown(&self, key: &DirectoryKey) {
        self.last_dispatch.lock().remove(key);
    }

    fn cooldown_elapsed(&self, key: &DirectoryKey) -> bool {
        self.last_dispatch
            .lock()
            .get(key)
            .map_or(true, |at| at.elapsed() >= self.config.cooldown)
    }

    fn touch_cooldown(&self, key: &DirectoryKey) {
        self.last_dispatch.lock().insert(key.clone(), Instant::now());
    }
}

/// Runs one fetch and folds the outcome into the store under the request's
/// original key, so a response arriving after the user navigated elsewhere
/// lands in its own slot and never corrupts the active view.
async fn fetch_and_apply<B: MediaBridge>(
    store: Arc<GalleryStore>,
    bridge: Arc<B>,
    events: flume::Sender<GalleryEvent>,
    key: DirectoryKey,
    range: Range<usize>,
) {
    // Dropped on every exit path, so the in-flight exclusion is released on
    // success, empty results, fetch failure and panics alike.
    let _guard = LoadingGuard {
        store: &store,
        key: &key,
    };

    let batch = match bridge.load_media_batch(key.as_str(), range.start, range.end).await {
        Ok(batch) => batch,
        Err(err) => {
            warn!("Media batch fetch for {} failed: {}", key, err);
            let _ = events.send(GalleryEvent::BatchFailed { key: key.clone() });
            return;
        }
    };

    let requested = range.end - range.start;
    let mut medias = batch.medias;

    if medias.is_empty() {
        // An empty page always exhausts the directory, whatever the
        // continuation signal says; otherwise the sentinel would retrigger
        // the same empty range forever.
        debug!("Empty batch for {}, directory exhausted", key);
        store.dispatch(Action::AddMedia {
            key: key.clone(),
            medias: Vec::new(),
            no_more_batches: true,
        });
        let _ = events.send(GalleryEvent::DirectoryExhausted { key: key.clone() });
        return;
    }

    medias.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    for (offset, item) in medias.iter_mut().enumerate() {
        item.index = range.start + offset;
    }

    let added = medias.len();
    let no_more = batch.no_more_batches.unwrap_or(added < requested);

    store.dispatch(Action::AddMedia {
        key: key.clone(),
        medias,
        no_more_batches: no_more,
    });

    let total = store.media_len(&key);
    debug!("Applied media batch for {}: {} added, {} total, exhausted={}", key, added, total, no_more);
    let _ = events.send(GalleryEvent::MediaAppended {
        key: key.clone(),
        added,
        total,
    });
    if no_more {
        let _ = events.send(GalleryEvent::DirectoryExhausted { key: key.clone() });
    }
}

/// Clears the loading flag when dropped.
struct LoadingGuard<'a> {
    store: &'a GalleryStore,
    key: &'a DirectoryKey,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::SetLoading {
            key: self.key.clone(),
            value: false,
        });
    }
}
