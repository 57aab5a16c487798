//! Keyed directory store.
//!
//! One mutable slot per [`DirectoryKey`], holding that directory's folder
//! names, loaded media and transient flags. This is the single mutable
//! resource of the gallery core: all mutation goes through [`Action`]
//! dispatch, readers get cloned snapshots, and slots for different keys
//! never interfere.
//!
//! Slots are created lazily on first visit and live for the session, bounded
//! by an LRU policy so long browsing sessions cannot grow without limit.

use std::num::NonZeroUsize;
use std::ops::Range;

use lru::LruCache;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::models::{DirectoryKey, DirectoryState, MediaItem};

/// Default number of directory slots kept in memory. Deep breadcrumb
/// round-trips stay well below this, so revisiting a directory finds its
/// state intact.
pub const DIRECTORY_CACHE_CAPACITY: usize = 64;

/// A state transition for one directory slot.
///
/// Every variant replaces the keyed slot wholesale; no partial mutation is
/// observable outside a dispatch.
#[derive(Debug, Clone)]
pub enum Action {
    /// Flip the in-flight flag for a directory.
    SetLoading { key: DirectoryKey, value: bool },
    /// Append a sorted, index-stamped batch and record the continuation
    /// verdict that came with it.
    AddMedia {
        key: DirectoryKey,
        medias: Vec<MediaItem>,
        no_more_batches: bool,
    },
    /// Record the immediate subfolder names for a directory.
    SetFolderNames { key: DirectoryKey, names: Vec<String> },
    /// Drop everything loaded for a directory, returning the slot to its
    /// default state.
    ResetDirectory { key: DirectoryKey },
}

/// Process-wide keyed gallery state.
pub struct GalleryStore {
    slots: RwLock<LruCache<DirectoryKey, DirectoryState>>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self::with_capacity(DIRECTORY_CACHE_CAPACITY)
    }

    /// Creates a store bounded to `capacity` directory slots (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Snapshot of a directory's state, creating the default slot on first
    /// access.
    pub fn state(&self, key: &DirectoryKey) -> DirectoryState {
        let mut slots = self.slots.write();
        slots
            .get_or_insert(key.clone(), DirectoryState::default)
            .clone()
    }

    /// Number of media items currently loaded for a directory.
    pub fn media_len(&self, key: &DirectoryKey) -> usize {
        self.slots.read().peek(key).map_or(0, |s| s.media.len())
    }

    /// Whether the half-open range `[start, stop)` is already fully covered
    /// by the directory's loaded media. Used to skip stale duplicate
    /// triggers before they dispatch a fetch.
    pub fn is_batch_loaded(&self, key: &DirectoryKey, start: usize, stop: usize) -> bool {
        self.slots
            .read()
            .peek(key)
            .map_or(false, |s| s.covers(start, stop))
    }

    /// Number of directory slots currently held.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Applies one transition. The keyed slot is replaced in a single
    /// critical section; dispatches for different keys cannot interleave
    /// within a slot.
    pub fn dispatch(&self, action: Action) {
        let mut slots = self.slots.write();
        match action {
            Action::SetLoading { key, value } => {
                let mut next = snapshot(&mut slots, &key);
                next.is_loading = value;
                slots.put(key, next);
            }
            Action::AddMedia {
                key,
                medias,
                no_more_batches,
            } => {
                let mut next = snapshot(&mut slots, &key);
                next.media.extend(medias);
                next.exhausted = no_more_batches;
                trace!("Media appended for {}: {} total, exhausted={}", key, next.media.len(), next.exhausted);
                slots.put(key, next);
            }
            Action::SetFolderNames { key, names } => {
                let mut next = snapshot(&mut slots, &key);
                next.folder_names = Some(names);
                slots.put(key, next);
            }
            Action::ResetDirectory { key } => {
                debug!("Directory slot reset for {}", key);
                slots.put(key, DirectoryState::default());
            }
        }
    }

    /// Atomic begin-load guard: checks in-flight exclusion and exhaustion,
    /// computes the next `[start, stop)` range from the loaded length and
    /// flips the loading flag, all inside one critical section. There is no
    /// suspension between the check and the set, so at most one fetch per
    /// key can ever be in flight.
    pub fn try_begin_load(&self, key: &DirectoryKey, batch_size: usize) -> Option<Range<usize>> {
        let mut slots = self.slots.write();
        let mut slot = snapshot(&mut slots, key);

        if slot.is_loading || slot.exhausted {
            return None;
        }

        let start = slot.media.len();
        let stop = start + batch_size;
        slot.is_loading = true;
        slots.put(key.clone(), slot);

        Some(start..stop)
    }
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(
    slots: &mut LruCache<DirectoryKey, DirectoryState>,
    key: &DirectoryKey,
) -> DirectoryState {
    slots.get(key).cloned().unwrap_or_default()
}
