//! Timed fade overlays. Each one is a pure function of the time elapsed since
//! its own start, so phases can never be re-entered.

use std::time::Duration;

use crate::constants::*;

/// `max(0, 255 - round(255 * fraction))`, with `fraction` clamped to [0, 1].
pub fn fade_alpha(fraction: f64) -> u8 {
    let faded = (255.0 * fraction.clamp(0.0, 1.0)).round() as i32;
    (255 - faded).max(0) as u8
}

fn fraction_between(elapsed: f64, start: f64, length: f64) -> f64 {
    if length <= 0.0 { 1.0 } else { (elapsed - start) / length }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashPhase {
    Showing,
    FadingOut,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    duration: f64,
    fade: f64,
}

impl Splash {
    pub fn new(duration: Duration, fade: Duration) -> Self {
        Self { duration: duration.as_secs_f64(), fade: fade.as_secs_f64() }
    }

    pub fn phase(&self, elapsed: Duration) -> SplashPhase {
        let t = elapsed.as_secs_f64();
        if t < self.duration {
            SplashPhase::Showing
        } else if t <= self.duration + self.fade {
            SplashPhase::FadingOut
        } else {
            SplashPhase::Done
        }
    }

    /// Alpha to draw at, or `None` once the splash is finished.
    pub fn show(&self, elapsed: Duration) -> Option<u8> {
        match self.phase(elapsed) {
            SplashPhase::Showing => Some(255),
            SplashPhase::FadingOut => {
                Some(fade_alpha(fraction_between(elapsed.as_secs_f64(), self.duration, self.fade)))
            }
            SplashPhase::Done => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    Captions,
    CaptionsFading,
    Message,
    MessageFading,
    Done,
}

/// Alphas of every onboarding element at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingFrame {
    pub phase: OnboardingPhase,
    pub captions: [u8; 3],
    pub message: u8,
}

/// First-run walkthrough: three captions appear one after the other, fade out
/// together, then a closing message is held and faded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onboarding {
    caption_offsets: [f64; 3],
    captions_fade_start: f64,
    captions_fade: f64,
    message_hold: f64,
    message_fade: f64,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self {
            caption_offsets: ONBOARDING_CAPTION_OFFSETS,
            captions_fade_start: ONBOARDING_CAPTIONS_FADE_START,
            captions_fade: ONBOARDING_CAPTIONS_FADE,
            message_hold: ONBOARDING_MESSAGE_HOLD,
            message_fade: ONBOARDING_MESSAGE_FADE,
        }
    }
}

impl Onboarding {
    fn message_start(&self) -> f64 {
        self.captions_fade_start + self.captions_fade
    }

    fn message_fade_start(&self) -> f64 {
        self.message_start() + self.message_hold
    }

    pub fn total(&self) -> Duration {
        Duration::from_secs_f64(self.message_fade_start() + self.message_fade)
    }

    pub fn phase(&self, elapsed: Duration) -> OnboardingPhase {
        let t = elapsed.as_secs_f64();
        if t < self.captions_fade_start {
            OnboardingPhase::Captions
        } else if t < self.message_start() {
            OnboardingPhase::CaptionsFading
        } else if t < self.message_fade_start() {
            OnboardingPhase::Message
        } else if t <= self.message_fade_start() + self.message_fade {
            OnboardingPhase::MessageFading
        } else {
            OnboardingPhase::Done
        }
    }

    /// Element alphas at `elapsed`, or `None` once the walkthrough is over.
    pub fn at(&self, elapsed: Duration) -> Option<OnboardingFrame> {
        let t = elapsed.as_secs_f64();
        let phase = self.phase(elapsed);

        let (captions, message) = match phase {
            OnboardingPhase::Captions => {
                let captions = self.caption_offsets.map(|offset| if t >= offset { 255 } else { 0 });
                (captions, 0)
            }
            OnboardingPhase::CaptionsFading => {
                let alpha = fade_alpha(fraction_between(t, self.captions_fade_start, self.captions_fade));
                ([alpha; 3], 0)
            }
            OnboardingPhase::Message => ([0; 3], 255),
            OnboardingPhase::MessageFading => {
                ([0; 3], fade_alpha(fraction_between(t, self.message_fade_start(), self.message_fade)))
            }
            OnboardingPhase::Done => return None,
        };
        Some(OnboardingFrame { phase, captions, message })
    }
}
