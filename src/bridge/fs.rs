//! Filesystem reference implementation of the command bridge.
//!
//! Serves folder listings and media batches straight from a local directory
//! tree: shallow traversal, extension filtering, natural-order sorting and
//! header-only dimension probing. Useful for embedding the engine without
//! an external backend process, and for end-to-end tests.
//!
//! No thumbnails are generated here; `thumbnail_path` points at the
//! original file and dimensions come from the image header alone.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::task;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{BridgeError, MediaBatch, MediaBridge};
use crate::models::MediaItem;
use crate::sort::natural_cmp;

/// Extensions served as media, matched case-insensitively.
const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// [`MediaBridge`] over a local directory tree rooted at a gallery root.
pub struct FsBridge {
    root: PathBuf,
}

impl FsBridge {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a `/`-joined directory key against the root. Empty, `.` and
    /// `..` segments are rejected so a key can never escape the root.
    fn resolve(&self, directory: &str) -> Result<PathBuf, BridgeError> {
        let mut dir = self.root.clone();
        if directory.is_empty() {
            return Ok(dir);
        }

        for segment in directory.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(BridgeError::InvalidDirectory(directory.to_string()));
            }
            dir.push(segment);
        }
        Ok(dir)
    }
}

impl MediaBridge for FsBridge {
    fn get_folder_names(
        &self,
        directory: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, BridgeError>> + Send {
        let resolved = self.resolve(directory);
        async move {
            let dir = resolved?;
            task::spawn_blocking(move || list_folder_names(&dir))
                .await
                .map_err(|err| BridgeError::Backend(format!("listing task failed: {err}")))?
                .map_err(into_backend_error)
        }
    }

    fn load_media_batch(
        &self,
        directory: &str,
        start: usize,
        stop: usize,
    ) -> impl std::future::Future<Output = Result<MediaBatch, BridgeError>> + Send {
        let resolved = self.resolve(directory);
        async move {
            let dir = resolved?;
            debug!("Loading media batch [{}, {}) from {:?}", start, stop, dir);
            task::spawn_blocking(move || load_batch(&dir, start, stop))
                .await
                .map_err(|err| BridgeError::Backend(format!("batch task failed: {err}")))?
                .map_err(into_backend_error)
        }
    }
}

fn into_backend_error(err: anyhow::Error) -> BridgeError {
    BridgeError::Backend(format!("{err:#}"))
}

/// Immediate subfolder names, natural-sorted, dot-directories excluded.
fn list_folder_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {:?}", dir))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();

    names.sort_by(|a, b| natural_cmp(a, b));
    Ok(names)
}

/// Media files directly inside `dir`, natural-sorted by file name.
fn list_media_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_media_file(path))
        .collect();

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(files)
}

fn load_batch(dir: &Path, start: usize, stop: usize) -> Result<MediaBatch> {
    let files = list_media_files(dir)?;
    let total = files.len();

    let mut medias = Vec::new();
    for (index, path) in files
        .iter()
        .enumerate()
        .skip(start)
        .take(stop.saturating_sub(start))
    {
        let (width, height) = match read_dimensions(path) {
            Ok(dims) => dims,
            Err(err) => {
                warn!("Skipping unreadable media file {:?}: {:#}", path, err);
                continue;
            }
        };

        let size_kb = std::fs::metadata(path).map(|meta| meta.len() / 1024).unwrap_or(0);
        let path_str = path.to_string_lossy().into_owned();
        medias.push(MediaItem {
            index,
            name: file_name(path),
            thumbnail_path: path_str.clone(),
            path: path_str,
            width,
            height,
            size_kb,
        });
    }

    Ok(MediaBatch {
        medias,
        no_more_batches: Some(stop >= total),
    })
}

/// Probes pixel dimensions from the image header without decoding pixels.
fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).with_context(|| format!("Failed to read dimensions: {:?}", path))
}

fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::new(width, height).save(path).unwrap();
    }

    /// root/
    ///   img1.png img2.png img10.png  (4x2)
    ///   notes.txt
    ///   albums/ trips/ .cache/
    ///   albums/cover.png             (2x4)
    fn fixture() -> TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();

        for name in ["img1.png", "img2.png", "img10.png"] {
            write_png(&root.join(name), 4, 2);
        }
        std::fs::write(root.join("notes.txt"), "not media").unwrap();

        for sub in ["albums", "trips", ".cache"] {
            std::fs::create_dir(root.join(sub)).unwrap();
        }
        write_png(&root.join("albums").join("cover.png"), 2, 4);

        dir
    }

    #[tokio::test]
    async fn test_folder_names_sorted_without_hidden() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let names = bridge.get_folder_names("").await.unwrap();
        assert_eq!(names, vec!["albums", "trips"]);
    }

    #[tokio::test]
    async fn test_subdirectory_listing() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let batch = bridge.load_media_batch("albums", 0, 30).await.unwrap();
        assert_eq!(batch.medias.len(), 1);
        assert_eq!(batch.medias[0].name, "cover.png");
        assert_eq!(batch.medias[0].dimensions(), (2, 4));
        assert_eq!(batch.no_more_batches, Some(true));
    }

    #[tokio::test]
    async fn test_batch_range_and_continuation() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let first = bridge.load_media_batch("", 0, 2).await.unwrap();
        let names: Vec<&str> = first.medias.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["img1.png", "img2.png"], "natural order, non-media excluded");
        assert_eq!(first.no_more_batches, Some(false));
        assert_eq!(first.medias[1].index, 1);

        let second = bridge.load_media_batch("", 2, 4).await.unwrap();
        let names: Vec<&str> = second.medias.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["img10.png"]);
        assert_eq!(second.no_more_batches, Some(true));
        assert_eq!(second.medias[0].index, 2);
    }

    #[tokio::test]
    async fn test_out_of_range_start_is_empty_and_exhausted() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let batch = bridge.load_media_batch("", 30, 60).await.unwrap();
        assert!(batch.medias.is_empty());
        assert_eq!(batch.no_more_batches, Some(true));
    }

    #[tokio::test]
    async fn test_dimensions_and_paths_resolve() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let batch = bridge.load_media_batch("", 0, 1).await.unwrap();
        let item = &batch.medias[0];
        assert_eq!(item.dimensions(), (4, 2));
        assert_eq!(item.path, item.thumbnail_path);
        assert!(Path::new(&item.path).is_file());
    }

    #[tokio::test]
    async fn test_traversal_segments_rejected() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        let err = bridge.get_folder_names("..").await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidDirectory(_)));

        let err = bridge.load_media_batch("a/../b", 0, 10).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidDirectory(_)));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = fixture();
        let bridge = FsBridge::new(dir.path());

        assert!(bridge.load_media_batch("nope", 0, 10).await.is_err());
        assert!(bridge.get_folder_names("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_file_is_skipped() {
        let dir = fixture();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let bridge = FsBridge::new(dir.path());

        let batch = bridge.load_media_batch("", 0, 30).await.unwrap();
        let names: Vec<&str> = batch.medias.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["img1.png", "img2.png", "img10.png"]);
    }
}
