use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub path: PathBuf,
    pub tags: BTreeSet<String>,
}

/// Read-only view of the locally cached media.
pub trait MediaCatalog {
    fn list_images(&self) -> Vec<PathBuf>;
    fn list_videos(&self) -> Vec<PathBuf>;
    fn tags_for(&self, path: &Path) -> BTreeSet<String>;

    /// Snapshot of every item, photos first.
    fn items(&self) -> Vec<MediaItem> {
        let images = self.list_images().into_iter().map(|path| (MediaKind::Image, path));
        let videos = self.list_videos().into_iter().map(|path| (MediaKind::Video, path));
        images
            .chain(videos)
            .map(|(kind, path)| MediaItem { kind, tags: self.tags_for(&path), path })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct MetadataEntry {
    #[serde(default)]
    contents: String,
}

/// Catalog backed by the sync job's output: two folders and a `metadata.json`.
#[derive(Debug, Default)]
pub struct DirCatalog {
    images: Vec<PathBuf>,
    videos: Vec<PathBuf>,
    tags: BTreeMap<String, BTreeSet<String>>,
    /// File name to metadata key; the first key in sorted order owns a shared name.
    by_name: HashMap<String, String>,
}

impl DirCatalog {
    pub fn load(pictures: &Path, videos: &Path, metadata: &Path) -> Result<Self> {
        let catalog = Self::new(
            load_sorted_paths(pictures, &IMAGE_EXTENSIONS)?,
            load_sorted_paths(videos, &VIDEO_EXTENSIONS)?,
            load_metadata(metadata),
        );
        info!(
            "Catalog: {} photos, {} videos, {} tagged files",
            catalog.images.len(),
            catalog.videos.len(),
            catalog.tags.len()
        );
        Ok(catalog)
    }

    fn new(images: Vec<PathBuf>, videos: Vec<PathBuf>, tags: BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut by_name = HashMap::new();
        for key in tags.keys() {
            if let Some(name) = Path::new(key).file_name() {
                by_name.entry(name.to_string_lossy().into_owned()).or_insert_with(|| key.clone());
            }
        }
        Self { images, videos, tags, by_name }
    }

    /// Every tag that appears in the metadata.
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.tags.values().flatten().cloned().collect()
    }
}

impl MediaCatalog for DirCatalog {
    fn list_images(&self) -> Vec<PathBuf> {
        self.images.clone()
    }

    fn list_videos(&self) -> Vec<PathBuf> {
        self.videos.clone()
    }

    fn tags_for(&self, path: &Path) -> BTreeSet<String> {
        // Keys are written as "<dir>/<file>" by the sync job; fall back to the file name
        let by_path = self.tags.get(path.to_string_lossy().as_ref());
        let by_name = || {
            let key = self.by_name.get(path.file_name()?.to_string_lossy().as_ref())?;
            self.tags.get(key)
        };
        by_path.or_else(by_name).cloned().unwrap_or_default()
    }
}

pub fn load_sorted_paths(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        warn!("Media directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry.context("Failed to read directory entry")?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            if extensions.contains(&ext.to_lowercase().as_str()) {
                paths.push(path);
            }
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn load_metadata(path: &Path) -> BTreeMap<String, BTreeSet<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("No tag metadata at {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };
    let entries: HashMap<String, MetadataEntry> = match serde_json::from_str(&text) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring unreadable tag metadata {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };

    entries
        .into_iter()
        .map(|(key, entry)| {
            let tags = entry
                .contents
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect();
            (key, tags)
        })
        .collect()
}
