pub mod splash;

use std::time::{Duration, Instant};

use log::info;
use raylib::prelude::Color;

use crate::constants::*;
use crate::input::{InputRouter, WidgetKind};
use crate::scene::{DrawCmd, Scene};
use crate::settings::Settings;
use splash::{Onboarding, Splash};

/// Control UI state shared by the overlay, the effects and the input router.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub ui_visible: bool,
    pub last_shown: Option<Instant>,
    pub settings: Settings,
}

impl OverlayState {
    /// The UI starts visible so the controls are discoverable at boot.
    pub fn new(settings: Settings, now: Instant) -> Self {
        Self { ui_visible: true, last_shown: Some(now), settings }
    }

    pub fn show(&mut self, now: Instant) {
        self.ui_visible = true;
        self.last_shown = Some(now);
    }

    /// Hides the UI once it has been idle for longer than `hide_after`.
    pub fn auto_hide(&mut self, now: Instant, hide_after: Duration) {
        if let Some(last_shown) = self.last_shown {
            if now.saturating_duration_since(last_shown) > hide_after {
                self.ui_visible = false;
            }
        }
    }
}

fn with_alpha(color: Color, alpha: u8) -> Color {
    Color::new(color.r, color.g, color.b, alpha)
}

/// Draws everything that sits on top of the media.
pub struct OverlayController {
    hide_after: Duration,
    splash: Option<(Instant, Splash)>,
    onboarding: Option<(Instant, Onboarding)>,
}

impl OverlayController {
    pub fn new(hide_after: Duration) -> Self {
        Self { hide_after, splash: None, onboarding: None }
    }

    pub fn start_splash(&mut self, splash: Splash, now: Instant) {
        self.splash = Some((now, splash));
    }

    pub fn start_onboarding(&mut self, onboarding: Onboarding, now: Instant) {
        self.onboarding = Some((now, onboarding));
    }

    pub fn onboarding_active(&self) -> bool {
        self.onboarding.is_some()
    }

    /// Applies auto-hide and appends this tick's overlay to `scene`.
    ///
    /// Returns true when the settings changed and need saving, which happens
    /// once when the onboarding walkthrough completes.
    pub fn update_and_draw(&mut self, state: &mut OverlayState, router: &InputRouter, now: Instant, scene: &mut Scene) -> bool {
        state.auto_hide(now, self.hide_after);
        if state.ui_visible {
            draw_controls(state, router, scene);
        }

        let mut settings_changed = false;

        if let Some((started, onboarding)) = self.onboarding {
            match onboarding.at(now.saturating_duration_since(started)) {
                Some(frame) => {
                    let display = router.display();
                    let (_, cy) = display.center();
                    for (i, (caption, alpha)) in ONBOARDING_CAPTIONS.iter().zip(frame.captions).enumerate() {
                        if alpha > 0 {
                            scene.text(*caption, 40, cy - 60 + 40 * i as i32, 28, with_alpha(Color::WHITE, alpha));
                        }
                    }
                    if frame.message > 0 {
                        scene.text(ONBOARDING_MESSAGE, 40, cy - 20, 40, with_alpha(Color::WHITE, frame.message));
                    }
                }
                None => {
                    info!("Onboarding finished");
                    self.onboarding = None;
                    state.settings.onboarding_done = true;
                    settings_changed = true;
                }
            }
        }

        if let Some((started, splash)) = self.splash {
            match splash.show(now.saturating_duration_since(started)) {
                Some(alpha) => scene.push(DrawCmd::Splash { alpha }),
                None => self.splash = None,
            }
        }

        settings_changed
    }
}

fn draw_controls(state: &OverlayState, router: &InputRouter, scene: &mut Scene) {
    for widget in router.widgets() {
        let rect = widget.rect;
        let label = widget.label(state);
        match widget.kind {
            WidgetKind::Button => {
                scene.push(DrawCmd::Fill { rect, color: Color::BLACK });
                if !label.is_empty() {
                    scene.text(label, rect.x + 12, rect.y + (rect.h - UI_FONT_SIZE) / 2, UI_FONT_SIZE, Color::WHITE);
                }
            }
            WidgetKind::Checkbox => {
                scene.push(DrawCmd::Outline { rect, thickness: 2, color: Color::WHITE });
                if widget.is_ticked(state) {
                    scene.push(DrawCmd::Fill { rect, color: Color::WHITE });
                }
                scene.text(label, rect.right() + 10, rect.y + (rect.h - UI_FONT_SIZE) / 2, UI_FONT_SIZE, Color::WHITE);
            }
        }
    }

    let tap = router.right_tap_area();
    scene.push(DrawCmd::Fill { rect: tap, color: Color::new(0, 0, 0, TAP_AREA_ALPHA) });
    scene.push(DrawCmd::Icon { name: ICON_SKIP, x: tap.x + 36, y: tap.h / 2 - 24 });

    let play_pause = if state.settings.slideshow_enabled { ICON_PLAY } else { ICON_PAUSE };
    let slideshow_button = router.slideshow_button();
    scene.push(DrawCmd::Icon { name: play_pause, x: slideshow_button.x, y: slideshow_button.y });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    const DISPLAY: Size = Size::new(800, 480);

    fn router() -> InputRouter {
        let tags = vec!["sky".to_string()];
        InputRouter::new(DISPLAY, RIGHT_TAP_AREA, &tags)
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn ui_hides_after_idle_delay() {
        let shown = Instant::now();
        let mut state = OverlayState::new(Settings::default(), shown);
        let mut controller = OverlayController::new(secs(5));

        let mut scene = Scene::new();
        controller.update_and_draw(&mut state, &router(), shown + secs(4), &mut scene);
        assert!(state.ui_visible);
        assert!(scene.contains_text("Transitions: On"));

        let mut scene = Scene::new();
        controller.update_and_draw(&mut state, &router(), shown + secs(6), &mut scene);
        assert!(!state.ui_visible);
        assert!(scene.cmds().is_empty());
    }

    #[test]
    fn hidden_ui_stays_hidden_until_shown_again() {
        let shown = Instant::now();
        let mut state = OverlayState::new(Settings::default(), shown);
        let mut controller = OverlayController::new(secs(5));
        controller.update_and_draw(&mut state, &router(), shown + secs(6), &mut Scene::new());
        assert!(!state.ui_visible);

        state.show(shown + secs(20));
        let mut scene = Scene::new();
        controller.update_and_draw(&mut state, &router(), shown + secs(22), &mut scene);
        assert!(state.ui_visible);
        assert!(scene.cmds().contains(&DrawCmd::Icon { name: ICON_PLAY, x: 24, y: 408 }));
    }

    #[test]
    fn pause_icon_when_slideshow_is_off() {
        let shown = Instant::now();
        let settings = Settings { slideshow_enabled: false, ..Settings::default() };
        let mut state = OverlayState::new(settings, shown);
        let mut scene = Scene::new();
        OverlayController::new(secs(5)).update_and_draw(&mut state, &router(), shown, &mut scene);
        assert!(scene.cmds().iter().any(|cmd| matches!(cmd, DrawCmd::Icon { name: ICON_PAUSE, .. })));
        assert!(scene.contains_text("sky"));
    }

    #[test]
    fn splash_is_drawn_until_it_finishes() {
        let start = Instant::now();
        let mut state = OverlayState::new(Settings::default(), start);
        let mut controller = OverlayController::new(secs(5));
        controller.start_splash(Splash::new(secs(3), secs(1)), start);

        let mut scene = Scene::new();
        controller.update_and_draw(&mut state, &router(), start + Duration::from_millis(3500), &mut scene);
        let alpha = scene.cmds().iter().find_map(|cmd| match cmd {
            DrawCmd::Splash { alpha } => Some(*alpha),
            _ => None,
        });
        assert!(matches!(alpha, Some(a) if a > 0 && a < 255));

        let mut scene = Scene::new();
        controller.update_and_draw(&mut state, &router(), start + secs(5), &mut scene);
        assert!(!scene.cmds().iter().any(|cmd| matches!(cmd, DrawCmd::Splash { .. })));
    }

    #[test]
    fn onboarding_completion_marks_settings() {
        let start = Instant::now();
        let mut state = OverlayState::new(Settings::default(), start);
        let mut controller = OverlayController::new(secs(5));
        let onboarding = Onboarding::default();
        controller.start_onboarding(onboarding, start);

        let mut scene = Scene::new();
        assert!(!controller.update_and_draw(&mut state, &router(), start + secs(1), &mut scene));
        assert!(scene.contains_text(ONBOARDING_CAPTIONS[0]));
        assert!(!scene.contains_text(ONBOARDING_CAPTIONS[1]));

        let done = start + onboarding.total() + secs(1);
        assert!(controller.update_and_draw(&mut state, &router(), done, &mut Scene::new()));
        assert!(state.settings.onboarding_done);
        assert!(!controller.onboarding_active());
    }
}
