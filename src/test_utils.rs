//! Scripted doubles for the platform boundary and the collaborators.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};

use crate::catalog::{MediaItem, MediaKind};
use crate::config::Timings;
use crate::ffmpeg::FrameSource;
use crate::geometry::Size;
use crate::input::InputEvent;
use crate::scene::Scene;
use crate::settings::{Settings, SettingsStore};

/// Screen whose clock advances by exactly one tick per present.
pub struct FakeScreen {
    pub size: Size,
    pub photo_size: Size,
    pub clock: Instant,
    pub fps: u32,
    /// One batch per poll; polls past the end see no events.
    pub events: VecDeque<Vec<InputEvent>>,
    pub presented: Vec<Scene>,
    pub loaded: Vec<PathBuf>,
    pub uploads: usize,
}

impl FakeScreen {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            photo_size: Size::new(1600, 600),
            clock: Instant::now(),
            fps: 0,
            events: VecDeque::new(),
            presented: Vec::new(),
            loaded: Vec::new(),
            uploads: 0,
        }
    }

    /// Queues `batch` to be returned by the poll of tick `tick` (0-based).
    pub fn script(&mut self, tick: usize, batch: Vec<InputEvent>) {
        while self.events.len() <= tick {
            self.events.push_back(Vec::new());
        }
        self.events[tick] = batch;
    }
}

impl crate::screen::Screen for FakeScreen {
    fn size(&self) -> Size {
        self.size
    }

    fn now(&self) -> Instant {
        self.clock
    }

    fn set_tick_rate(&mut self, fps: u32) {
        self.fps = fps;
    }

    fn load_photo(&mut self, path: &Path) -> Result<Size> {
        self.loaded.push(path.to_path_buf());
        Ok(self.photo_size)
    }

    fn upload_video_frame(&mut self, rgba: &[u8], size: Size) -> Result<()> {
        if rgba.len() != (size.w * size.h * 4) as usize {
            bail!("frame of {} bytes does not match {:?}", rgba.len(), size);
        }
        self.uploads += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.events.pop_front().unwrap_or_default()
    }

    fn present(&mut self, scene: &Scene) {
        self.presented.push(scene.clone());
        self.clock += Duration::from_secs(1) / self.fps.max(1);
    }
}

/// Video source yielding `remaining` black frames.
pub struct FakeDecoder {
    pub size: Size,
    pub remaining: usize,
    frame: Vec<u8>,
}

impl FakeDecoder {
    pub fn new(size: Size, frames: usize) -> Self {
        Self { size, remaining: frames, frame: vec![0; (size.w * size.h * 4) as usize] }
    }
}

impl FrameSource for FakeDecoder {
    fn frame_size(&self) -> Size {
        self.size
    }

    fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(&self.frame))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub settings: Option<Settings>,
    pub saves: usize,
    pub fail: bool,
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if self.fail {
            bail!("disk full");
        }
        self.saves += 1;
        self.settings = Some(settings.clone());
        Ok(())
    }
}

/// One-second effects at 10 ticks per second keep session tests short.
pub fn fast_timings() -> Timings {
    Timings {
        zoom_duration: Duration::from_secs(1),
        translate_duration: Duration::from_secs(1),
        image_fps: 10,
        video_fps: 10,
        ..Timings::default()
    }
}

pub fn media_item(kind: MediaKind, path: impl Into<PathBuf>, tags: &[&str]) -> MediaItem {
    MediaItem {
        kind,
        path: path.into(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    }
}
