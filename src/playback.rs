//! Per-item render cycle shared by photos and videos.
//!
//! Within a tick the order is fixed: effect frame, overlay, input drain, then
//! present. A session ends on natural expiry, on `Advance` or on `Quit`; the
//! last two are only noticed at the drain point.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use log::{debug, info, warn};
use rand::Rng;
use raylib::prelude::Color;
use thiserror::Error;

use crate::catalog::MediaItem;
use crate::config::Timings;
use crate::effect::{Direction, Effect, FrameStep, frame_at, pick_effect};
use crate::ffmpeg::FrameSource;
use crate::geometry::{Rect, Size, fit};
use crate::input::{InputRouter, Routed};
use crate::overlay::{OverlayController, OverlayState};
use crate::scene::{DrawCmd, Scene};
use crate::screen::Screen;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Ran to the end of its duration or stream.
    Expired,
    /// The viewer asked for the next item.
    Advanced,
    /// The viewer asked to leave the application.
    Quit,
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("media file not found: {0}")]
    MissingMedia(PathBuf),
    #[error("video has no decodable frames: {0}")]
    EmptyStream(PathBuf),
}

/// Everything a session needs besides the screen and the media itself.
pub struct Stage {
    pub state: OverlayState,
    pub overlays: OverlayController,
    pub router: InputRouter,
    pub store: Box<dyn SettingsStore>,
    pub timings: Timings,
}

impl Stage {
    fn draw_overlay(&mut self, now: Instant, scene: &mut Scene) {
        if self.overlays.update_and_draw(&mut self.state, &self.router, now, scene) {
            if let Err(e) = self.store.save(&self.state.settings) {
                warn!("Failed to save settings: {:#}", e);
            }
        }
    }

    /// Routes every pending event. `Quit` ends the batch at once; `Advance`
    /// lets the rest of the batch apply its side effects first.
    fn drain_events<S: Screen>(&mut self, screen: &mut S, now: Instant) -> Option<Outcome> {
        let mut outcome = None;
        for event in screen.poll_events() {
            match self.router.route(&event, &mut self.state, &mut *self.store, now) {
                Routed::Quit => return Some(Outcome::Quit),
                Routed::Advance => outcome = Some(Outcome::Advanced),
                Routed::Handled | Routed::Ignored => {}
            }
        }
        outcome
    }
}

fn ensure_exists(path: &Path) -> Result<(), PlaybackError> {
    if path.exists() { Ok(()) } else { Err(PlaybackError::MissingMedia(path.to_path_buf())) }
}

/// Fixed parameters of one photo on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession<'a> {
    pub item: &'a MediaItem,
    pub start_time: Instant,
    pub base: Rect,
    pub effect: Effect,
    pub direction: Direction,
}

impl<'a> PlaybackSession<'a> {
    fn init<S: Screen, R: Rng>(screen: &mut S, item: &'a MediaItem, rng: &mut R) -> Result<Self> {
        ensure_exists(&item.path)?;
        let media = screen.load_photo(&item.path)?;
        let base = fit(media, screen.size());
        let (effect, direction) = pick_effect(rng);
        info!("Showing {} with {:?} {:?}", item.path.display(), effect, direction);

        Ok(Self { item, start_time: screen.now(), base, effect, direction })
    }
}

pub fn play_image<S: Screen, R: Rng>(screen: &mut S, stage: &mut Stage, item: &MediaItem, rng: &mut R) -> Result<Outcome> {
    let session = PlaybackSession::init(screen, item, rng)?;
    screen.set_tick_rate(stage.timings.image_fps);
    let display = screen.size();

    loop {
        let now = screen.now();
        let step = frame_at(
            now.saturating_duration_since(session.start_time),
            session.base,
            display,
            session.effect,
            session.direction,
            stage.state.settings.transitions_enabled,
            &stage.timings,
        )?;
        let FrameStep::Render(frame) = step else {
            debug!("{} reached the end of its {:?} effect", session.item.path.display(), session.effect);
            return Ok(Outcome::Expired);
        };

        let mut scene = Scene::new();
        scene.push(DrawCmd::Clear(Color::BLACK));
        scene.push(DrawCmd::Photo(frame));
        stage.draw_overlay(now, &mut scene);

        if let Some(outcome) = stage.drain_events(screen, now) {
            return Ok(outcome);
        }
        screen.present(&scene);
    }
}

/// Plays a video until its stream ends. `open` is only called once the file
/// is known to exist.
pub fn play_video<S: Screen>(
    screen: &mut S,
    stage: &mut Stage,
    item: &MediaItem,
    open: &mut dyn FnMut(&Path, Size) -> Result<Box<dyn FrameSource>>,
) -> Result<Outcome> {
    ensure_exists(&item.path)?;
    let display = screen.size();
    let mut source = open(&item.path, display)?;
    screen.set_tick_rate(stage.timings.video_fps);
    info!("Playing {}", item.path.display());

    let mut frames = 0usize;
    loop {
        let now = screen.now();
        let size = source.frame_size();
        let Some(pixels) = source.next_frame()? else {
            if frames == 0 {
                return Err(PlaybackError::EmptyStream(item.path.clone()).into());
            }
            debug!("{} ended after {} frames", item.path.display(), frames);
            return Ok(Outcome::Expired);
        };
        frames += 1;
        screen.upload_video_frame(pixels, size)?;

        let mut scene = Scene::new();
        scene.push(DrawCmd::Clear(Color::BLACK));
        scene.push(DrawCmd::VideoFrame(display.rect()));
        stage.draw_overlay(now, &mut scene);

        if let Some(outcome) = stage.drain_events(screen, now) {
            return Ok(outcome);
        }
        screen.present(&scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MediaKind;
    use crate::input::{InputEvent, Key};
    use crate::overlay::splash::Onboarding;
    use crate::settings::Settings;
    use crate::test_utils::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const DISPLAY: Size = Size::new(800, 480);

    fn stage(screen: &FakeScreen) -> Stage {
        let tags: Vec<String> = Vec::new();
        let timings = fast_timings();
        Stage {
            state: OverlayState::new(Settings::default(), screen.clock),
            overlays: OverlayController::new(timings.ui_hide_after),
            router: InputRouter::new(DISPLAY, timings.right_tap_fraction, &tags),
            store: Box::new(MemoryStore::default()),
            timings,
        }
    }

    fn photo() -> (NamedTempFile, MediaItem) {
        let file = NamedTempFile::new().unwrap();
        let item = media_item(MediaKind::Image, file.path(), &[]);
        (file, item)
    }

    fn photos(scene: &Scene) -> Vec<crate::effect::Frame> {
        scene
            .cmds()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Photo(frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn photo_session_expires_without_rendering_the_boundary_frame() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = play_image(&mut screen, &mut stage, &item, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Expired);
        assert_eq!(screen.fps, 10);
        // Ticks at 0.0 .. 0.9 s are drawn, the one at 1.0 s is not
        assert_eq!(screen.presented.len(), 10);
        assert_eq!(screen.loaded, vec![item.path.clone()]);

        let first = photos(&screen.presented[0]);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].dest, DISPLAY.rect());
    }

    #[test]
    fn every_tick_draws_background_then_photo_then_overlay() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(2)).unwrap();

        for scene in &screen.presented {
            assert_eq!(scene.cmds()[0], DrawCmd::Clear(Color::BLACK));
            assert!(matches!(scene.cmds()[1], DrawCmd::Photo(_)));
            assert!(scene.contains_text("Transitions: On"));
        }
    }

    #[test]
    fn right_arrow_advances_before_presenting() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        screen.script(3, vec![InputEvent::Key(Key::Right)]);
        let mut stage = stage(&screen);

        let outcome = play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(outcome, Outcome::Advanced);
        assert_eq!(screen.presented.len(), 3);
    }

    #[test]
    fn quit_ends_the_batch_immediately() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        // The slideshow toggle after the quit must not be applied
        screen.script(0, vec![InputEvent::Quit, InputEvent::PointerDown { x: 30, y: DISPLAY.h - 60 }]);
        let mut stage = stage(&screen);

        let outcome = play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert!(stage.state.settings.slideshow_enabled);
        assert!(screen.presented.is_empty());
    }

    #[test]
    fn advance_still_applies_the_rest_of_the_batch() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        screen.script(
            1,
            vec![
                InputEvent::PointerDown { x: DISPLAY.w - 1, y: DISPLAY.h / 2 },
                InputEvent::PointerDown { x: 150, y: DISPLAY.h - 60 },
            ],
        );
        let mut stage = stage(&screen);

        let outcome = play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(outcome, Outcome::Advanced);
        assert!(!stage.state.settings.transitions_enabled);
    }

    #[test]
    fn disabling_transitions_freezes_the_next_frame() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        screen.script(2, vec![InputEvent::PointerDown { x: 150, y: DISPLAY.h - 60 }]);
        let mut stage = stage(&screen);

        assert_eq!(play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(6)).unwrap(), Outcome::Expired);
        let base = fit(screen.photo_size, DISPLAY);
        for scene in &screen.presented[3..] {
            assert_eq!(photos(scene)[0].image_rect, base);
        }
        assert!(screen.presented[9].contains_text("Transitions: Off"));
    }

    #[test]
    fn ui_auto_hides_during_a_long_session() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        stage.timings.zoom_duration = Duration::from_secs(8);
        stage.timings.translate_duration = Duration::from_secs(8);

        play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(screen.presented.len(), 80);
        assert!(screen.presented[40].contains_text("Transitions"));
        assert!(!screen.presented[60].contains_text("Transitions"));
        assert!(!stage.state.ui_visible);
    }

    #[test]
    fn missing_photo_is_fatal() {
        let item = media_item(MediaKind::Image, "/definitely/not/here.jpg", &[]);
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        let err = play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(8)).unwrap_err();
        assert!(matches!(err.downcast_ref::<PlaybackError>(), Some(PlaybackError::MissingMedia(_))));
        assert!(screen.loaded.is_empty());
    }

    #[test]
    fn video_plays_until_end_of_stream() {
        let file = NamedTempFile::new().unwrap();
        let item = media_item(MediaKind::Video, file.path(), &[]);
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        let mut open = |_: &Path, size: Size| -> Result<Box<dyn FrameSource>> { Ok(Box::new(FakeDecoder::new(size, 5))) };

        assert_eq!(play_video(&mut screen, &mut stage, &item, &mut open).unwrap(), Outcome::Expired);
        assert_eq!(screen.uploads, 5);
        assert_eq!(screen.presented.len(), 5);
        assert!(matches!(screen.presented[0].cmds()[1], DrawCmd::VideoFrame(rect) if rect == DISPLAY.rect()));
    }

    #[test]
    fn video_can_be_skipped() {
        let file = NamedTempFile::new().unwrap();
        let item = media_item(MediaKind::Video, file.path(), &[]);
        let mut screen = FakeScreen::new(DISPLAY);
        screen.script(2, vec![InputEvent::PointerDown { x: DISPLAY.w - 10, y: 10 }]);
        let mut stage = stage(&screen);
        let mut open = |_: &Path, size: Size| -> Result<Box<dyn FrameSource>> { Ok(Box::new(FakeDecoder::new(size, 100))) };

        assert_eq!(play_video(&mut screen, &mut stage, &item, &mut open).unwrap(), Outcome::Advanced);
        assert_eq!(screen.presented.len(), 2);
    }

    #[test]
    fn video_without_frames_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        let item = media_item(MediaKind::Video, file.path(), &[]);
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        let mut open = |_: &Path, size: Size| -> Result<Box<dyn FrameSource>> { Ok(Box::new(FakeDecoder::new(size, 0))) };

        let err = play_video(&mut screen, &mut stage, &item, &mut open).unwrap_err();
        assert!(matches!(err.downcast_ref::<PlaybackError>(), Some(PlaybackError::EmptyStream(_))));
        assert!(screen.presented.is_empty());
    }

    #[test]
    fn onboarding_completion_survives_a_failing_store() {
        let (_file, item) = photo();
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        stage.store = Box::new(MemoryStore { fail: true, ..MemoryStore::default() });
        stage.timings.zoom_duration = Duration::from_secs(13);
        stage.timings.translate_duration = Duration::from_secs(13);
        stage.overlays.start_onboarding(Onboarding::default(), screen.clock);

        let outcome = play_image(&mut screen, &mut stage, &item, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(outcome, Outcome::Expired);
        assert_eq!(screen.presented.len(), 130);
        assert!(stage.state.settings.onboarding_done);
        assert!(!stage.overlays.onboarding_active());
    }

    #[test]
    fn missing_video_never_opens_a_decoder() {
        let item = media_item(MediaKind::Video, "/definitely/not/here.mp4", &[]);
        let mut screen = FakeScreen::new(DISPLAY);
        let mut stage = stage(&screen);
        let mut opened = false;
        let mut open = |_: &Path, size: Size| -> Result<Box<dyn FrameSource>> {
            opened = true;
            Ok(Box::new(FakeDecoder::new(size, 1)))
        };
        assert!(play_video(&mut screen, &mut stage, &item, &mut open).is_err());
        assert!(!opened);
    }
}
