use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod app;
mod catalog;
mod config;
mod constants;
mod effect;
mod ffmpeg;
mod geometry;
mod input;
mod overlay;
mod playback;
mod raylib_screen;
mod scene;
mod screen;
mod sequencer;
mod settings;
mod texture_loader;
#[cfg(test)]
mod test_utils;

use crate::catalog::{DirCatalog, MediaCatalog};
use crate::config::Args;
use crate::ffmpeg::{Ffmpeg, FrameSource};
use crate::geometry::Size;
use crate::input::InputRouter;
use crate::overlay::splash::{Onboarding, Splash};
use crate::overlay::{OverlayController, OverlayState};
use crate::playback::Stage;
use crate::raylib_screen::RaylibScreen;
use crate::screen::Screen;
use crate::settings::{JsonSettingsStore, SettingsStore};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let timings = args.timings()?;
    let catalog = DirCatalog::load(&args.pictures, &args.videos, &args.metadata).context("Failed to load media catalog")?;
    let tags = catalog.all_tags();

    let store = JsonSettingsStore::new(&args.options);
    let mut settings = store.load().unwrap_or_else(|e| {
        warn!("Using default settings: {:#}", e);
        Default::default()
    });
    settings.merge_tags(&tags);
    info!("Settings from {}: {:?}", store.path().display(), settings);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut screen = RaylibScreen::open(args.screen.size(), args.windowed, &args.icons, args.splash.as_deref())?;
    let now = screen.now();

    let mut overlays = OverlayController::new(timings.ui_hide_after);
    let splash = Splash::new(timings.splash_duration, timings.splash_fade);
    overlays.start_splash(splash, now);
    if !settings.onboarding_done {
        overlays.start_onboarding(Onboarding::default(), now + timings.splash_duration + timings.splash_fade);
    }
    if overlays.onboarding_active() {
        info!("First start, onboarding will follow the splash");
    }

    let mut stage = Stage {
        state: OverlayState::new(settings, now),
        overlays,
        router: InputRouter::new(screen.size(), timings.right_tap_fraction, &tags),
        store: Box::new(store),
        timings,
    };

    let mut open_video = |path: &Path, size: Size| -> Result<Box<dyn FrameSource>> { Ok(Box::new(Ffmpeg::open(path, size)?)) };
    app::run(&mut screen, &mut stage, catalog.items(), &mut rng, &mut open_video)
}
