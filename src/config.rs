use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::constants::*;
use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenPreset {
    #[value(name = "7inch")]
    SevenInch,
    #[value(name = "10inch")]
    TenInch,
    #[value(name = "15inch")]
    FifteenInch,
}

impl ScreenPreset {
    pub fn size(self) -> Size {
        let (w, h) = match self {
            ScreenPreset::SevenInch => SCREEN_7INCH,
            ScreenPreset::TenInch => SCREEN_10INCH,
            ScreenPreset::FifteenInch => SCREEN_15INCH,
        };
        Size::new(w, h)
    }
}

/// Kiosk digital photo frame.
#[derive(Debug, Parser)]
#[command(name = "photoframe", version, about)]
pub struct Args {
    /// Display size preset
    #[arg(long, value_enum, default_value = "7inch")]
    pub screen: ScreenPreset,

    /// Run in a regular window instead of borderless fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Directory of cached photos
    #[arg(long, default_value = "pictures")]
    pub pictures: PathBuf,

    /// Directory of cached videos
    #[arg(long, default_value = "videos")]
    pub videos: PathBuf,

    /// Tag metadata written by the sync job
    #[arg(long, default_value = "metadata.json")]
    pub metadata: PathBuf,

    /// Persisted UI settings
    #[arg(long, default_value = "options.json")]
    pub options: PathBuf,

    /// Directory holding play.png, pause.png and skip.png
    #[arg(long, default_value = "icons")]
    pub icons: PathBuf,

    /// Image shown as a startup splash
    #[arg(long)]
    pub splash: Option<PathBuf>,

    /// Seed for effect and shuffle choices, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Duration of the zoom effect in seconds
    #[arg(long, default_value_t = ZOOM_DURATION)]
    pub zoom_duration: f64,

    /// Duration of the pan effect in seconds
    #[arg(long, default_value_t = TRANSLATE_DURATION)]
    pub translate_duration: f64,

    /// Seconds of inactivity before the control UI hides
    #[arg(long, default_value_t = UI_HIDE_AFTER)]
    pub ui_hide_after: f64,

    #[arg(long, default_value_t = PICTURE_FPS)]
    pub image_fps: u32,

    #[arg(long, default_value_t = VIDEO_FPS)]
    pub video_fps: u32,
}

/// Every timing knob of a session, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    pub zoom_duration: Duration,
    pub zoom_gain: f64,
    pub translate_duration: Duration,
    pub translate_overscale: f64,
    pub ui_hide_after: Duration,
    pub right_tap_fraction: f64,
    pub image_fps: u32,
    pub video_fps: u32,
    pub splash_duration: Duration,
    pub splash_fade: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            zoom_duration: Duration::from_secs_f64(ZOOM_DURATION),
            zoom_gain: ZOOM_GAIN,
            translate_duration: Duration::from_secs_f64(TRANSLATE_DURATION),
            translate_overscale: TRANSLATE_OVERSCALE,
            ui_hide_after: Duration::from_secs_f64(UI_HIDE_AFTER),
            right_tap_fraction: RIGHT_TAP_AREA,
            image_fps: PICTURE_FPS,
            video_fps: VIDEO_FPS,
            splash_duration: Duration::from_secs_f64(SPLASH_DURATION),
            splash_fade: Duration::from_secs_f64(SPLASH_FADE),
        }
    }
}

impl Args {
    pub fn timings(&self) -> anyhow::Result<Timings> {
        let seconds = |name: &str, value: f64| {
            Duration::try_from_secs_f64(value)
                .ok()
                .filter(|d| !d.is_zero())
                .ok_or_else(|| anyhow::anyhow!("--{} must be a positive number of seconds, got {}", name, value))
        };
        anyhow::ensure!(self.image_fps > 0 && self.video_fps > 0, "frame rates must be positive");

        Ok(Timings {
            zoom_duration: seconds("zoom-duration", self.zoom_duration)?,
            translate_duration: seconds("translate-duration", self.translate_duration)?,
            ui_hide_after: seconds("ui-hide-after", self.ui_hide_after)?,
            image_fps: self.image_fps,
            video_fps: self.video_fps,
            ..Timings::default()
        })
    }
}
