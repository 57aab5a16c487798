use serde::{Deserialize, Serialize};

/// A single gallery entry as delivered by the media backend.
///
/// Items are immutable once received. `index` is the stable position of the
/// item within its directory's loaded sequence: assigned in load order and
/// never reused for that directory within a session, so it stays valid as a
/// viewer cursor even while later batches append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub thumbnail_path: String,
    pub width: u32,
    pub height: u32,
    /// File size in kilobytes.
    pub size_kb: u64,
}

impl MediaItem {
    /// Create a new MediaItem with just the essential display fields.
    pub fn new(index: usize, name: impl Into<String>, width: u32, height: u32) -> Self {
        let name = name.into();
        Self {
            index,
            path: name.clone(),
            thumbnail_path: name.clone(),
            name,
            width,
            height,
            size_kb: 0,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Pixel dimensions as a tuple, in the order the packer consumes them.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
