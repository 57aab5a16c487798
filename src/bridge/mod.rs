//! Command bridge to the media backend.
//!
//! The gallery core never touches the filesystem or decodes images itself;
//! folder listings and media metadata come exclusively through
//! [`MediaBridge`]. The backend may live in-process (see [`fs::FsBridge`])
//! or behind an IPC boundary; the core only ever sees these two calls.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MediaItem;

pub mod fs;

#[cfg(test)]
pub(crate) mod mock;

/// Errors surfaced by a bridge implementation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid directory: {0:?}")]
    InvalidDirectory(String),

    #[error("backend i/o failure")]
    Io(#[from] std::io::Error),

    #[error("backend failure: {0}")]
    Backend(String),
}

/// One page of media metadata for a half-open range request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaBatch {
    /// Items in backend-defined order; the loader re-sorts by name.
    pub medias: Vec<MediaItem>,
    /// Authoritative continuation signal when present. `None` lets the
    /// loader infer exhaustion from a short result.
    pub no_more_batches: Option<bool>,
}

/// Asynchronous request/response contract implemented by the media backend.
///
/// Implementations must be cheap to share behind an `Arc` and their futures
/// `Send`, since fetches run as detached tasks.
pub trait MediaBridge: Send + Sync + 'static {
    /// Immediate subfolder names of `directory` (a `/`-joined path relative
    /// to the gallery root; empty string for the root itself).
    fn get_folder_names(
        &self,
        directory: &str,
    ) -> impl Future<Output = Result<Vec<String>, BridgeError>> + Send;

    /// Media metadata for the half-open range `[start, stop)` of
    /// `directory`, in backend-defined order.
    fn load_media_batch(
        &self,
        directory: &str,
        start: usize,
        stop: usize,
    ) -> impl Future<Output = Result<MediaBatch, BridgeError>> + Send;
}
