use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// User choices that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub slideshow_enabled: bool,
    pub transitions_enabled: bool,
    pub tag_filters: BTreeMap<String, bool>,
    pub onboarding_done: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slideshow_enabled: true,
            transitions_enabled: true,
            tag_filters: BTreeMap::new(),
            onboarding_done: false,
        }
    }
}

impl Settings {
    /// Adds a filter entry, enabled, for every tag not seen before.
    pub fn merge_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            self.tag_filters.entry(tag.clone()).or_insert(true);
        }
    }

    /// A media item may be shown unless one of its tags is switched off.
    pub fn allows<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> bool {
        tags.into_iter().all(|tag| self.tag_filters.get(tag).copied().unwrap_or(true))
    }
}

pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings kept as pretty-printed JSON next to the media folders.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings {}", self.path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid settings file {}", self.path.display()))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text).with_context(|| format!("Failed to write settings {}", self.path.display()))
    }
}
