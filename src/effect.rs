//! Time-driven zoom and pan effects applied to a photo during its session.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::config::Timings;
use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Zoom,
    Translate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    None,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("translate effect needs a left or right direction, got {0:?}")]
    InvalidDirection(Direction),
}

/// Picks the effect of a session, and its direction when panning.
pub fn pick_effect<R: Rng>(rng: &mut R) -> (Effect, Direction) {
    if rng.random_bool(0.5) {
        (Effect::Zoom, Direction::None)
    } else if rng.random_bool(0.5) {
        (Effect::Translate, Direction::Left)
    } else {
        (Effect::Translate, Direction::Right)
    }
}

pub fn duration_of(effect: Effect, timings: &Timings) -> Duration {
    match effect {
        Effect::Zoom => timings.zoom_duration,
        Effect::Translate => timings.translate_duration,
    }
}

/// One rendered state of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Where the whole scaled image sits on the display, overflow included.
    pub image_rect: Rect,
    /// Visible part of the scaled image, in scaled-image pixels.
    pub region: Rect,
    /// Where `region` is drawn on the display.
    pub dest: Rect,
}

impl Frame {
    fn cropped(image_rect: Rect, display: Size) -> Frame {
        let visible = image_rect.clip(&display.rect());
        Frame {
            image_rect,
            region: Rect::new(visible.x - image_rect.x, visible.y - image_rect.y, visible.w, visible.h),
            dest: visible,
        }
    }

    /// `region` expressed in pixels of a texture of size `texture`.
    pub fn source_in(&self, texture: Size) -> (f32, f32, f32, f32) {
        let sx = texture.w as f32 / self.image_rect.w.max(1) as f32;
        let sy = texture.h as f32 / self.image_rect.h.max(1) as f32;
        (
            self.region.x as f32 * sx,
            self.region.y as f32 * sy,
            self.region.w as f32 * sx,
            self.region.h as f32 * sy,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    Render(Frame),
    Expired,
}

/// Frame of the session at `elapsed`.
///
/// Expiry is decided before anything is computed, so the frame at exactly the
/// effect duration is never produced. With effects disabled the photo stays on
/// its base rect but the session still ends on the same boundary.
pub fn frame_at(
    elapsed: Duration,
    base: Rect,
    display: Size,
    effect: Effect,
    direction: Direction,
    effects_enabled: bool,
    timings: &Timings,
) -> Result<FrameStep, EffectError> {
    if effect == Effect::Translate && !matches!(direction, Direction::Left | Direction::Right) {
        return Err(EffectError::InvalidDirection(direction));
    }

    let duration = duration_of(effect, timings);
    if elapsed >= duration {
        return Ok(FrameStep::Expired);
    }
    if !effects_enabled {
        return Ok(FrameStep::Render(Frame::cropped(base, display)));
    }

    let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
    let frame = match effect {
        Effect::Zoom => zoom(base, display, progress, timings.zoom_gain),
        Effect::Translate => translate(base, display, progress, direction, timings.translate_overscale),
    };
    Ok(FrameStep::Render(frame))
}

fn zoom(base: Rect, display: Size, progress: f64, gain: f64) -> Frame {
    let zoomed = base.scaled_about_center(1.0 + progress * gain);
    let mut frame = Frame::cropped(zoomed, display);
    frame.dest = frame.dest.with_center(display.center());
    frame
}

fn translate(base: Rect, display: Size, progress: f64, direction: Direction, overscale: f64) -> Frame {
    let mut scaled = base.scaled_about_center(overscale);
    let slack = scaled.w - base.w;
    let offset = (slack as f64 * progress).floor() as i32;

    scaled.x = match direction {
        Direction::Left => -offset,
        _ => -(slack - offset),
    };
    Frame::cropped(scaled, display)
}
