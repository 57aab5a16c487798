//! Scripted in-memory bridge for tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::{BridgeError, MediaBatch, MediaBridge};
use crate::models::MediaItem;

/// Deterministic [`MediaBridge`] backed by in-memory listings.
///
/// Counts calls at dispatch time (before any simulated latency), so tests
/// can assert how many fetches the guards actually let through.
pub(crate) struct MockBridge {
    folders: RwLock<HashMap<String, Vec<String>>>,
    media: RwLock<HashMap<String, Vec<MediaItem>>>,
    batch_calls: AtomicUsize,
    folder_calls: AtomicUsize,
    fail_batches: AtomicBool,
    explicit_continuation: AtomicBool,
    delay: RwLock<Duration>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            folders: RwLock::new(HashMap::new()),
            media: RwLock::new(HashMap::new()),
            batch_calls: AtomicUsize::new(0),
            folder_calls: AtomicUsize::new(0),
            fail_batches: AtomicBool::new(false),
            explicit_continuation: AtomicBool::new(true),
            delay: RwLock::new(Duration::ZERO),
        }
    }

    /// Scripts `count` media items named `img0.jpg..` with varying aspect
    /// ratios under `directory`.
    pub fn with_media(self, directory: &str, count: usize) -> Self {
        let items = (0..count)
            .map(|i| MediaItem::new(i, format!("img{i}.jpg"), 400 + (i as u32 % 5) * 80, 300))
            .collect();
        self.with_media_items(directory, items)
    }

    pub fn with_media_items(self, directory: &str, items: Vec<MediaItem>) -> Self {
        self.media.write().insert(directory.to_string(), items);
        self
    }

    pub fn with_folders(self, directory: &str, names: &[&str]) -> Self {
        self.folders
            .write()
            .insert(directory.to_string(), names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Simulated latency before each batch response.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write() = delay;
        self
    }

    /// Omit `no_more_batches`, forcing the loader to infer exhaustion.
    pub fn without_continuation_signal(self) -> Self {
        self.explicit_continuation.store(false, Ordering::SeqCst);
        self
    }

    pub fn set_fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn folder_calls(&self) -> usize {
        self.folder_calls.load(Ordering::SeqCst)
    }
}

impl MediaBridge for MockBridge {
    fn get_folder_names(
        &self,
        directory: &str,
    ) -> impl Future<Output = Result<Vec<String>, BridgeError>> + Send {
        self.folder_calls.fetch_add(1, Ordering::SeqCst);
        let names = self.folders.read().get(directory).cloned().unwrap_or_default();
        async move { Ok(names) }
    }

    fn load_media_batch(
        &self,
        directory: &str,
        start: usize,
        stop: usize,
    ) -> impl Future<Output = Result<MediaBatch, BridgeError>> + Send {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.read();
        let fail = self.fail_batches.load(Ordering::SeqCst);
        let explicit = self.explicit_continuation.load(Ordering::SeqCst);
        let all = self.media.read().get(directory).cloned().unwrap_or_default();

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                return Err(BridgeError::Backend("scripted failure".into()));
            }

            let total = all.len();
            let start = start.min(total);
            let stop = stop.min(total).max(start);
            let medias = all[start..stop].to_vec();
            let no_more_batches = explicit.then_some(stop >= total);

            Ok(MediaBatch {
                medias,
                no_more_batches,
            })
        }
    }
}
