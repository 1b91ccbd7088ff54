//! Routing of the single input stream between exit, playback shortcuts and the
//! control UI.

use std::time::Instant;

use log::{debug, warn};

use crate::geometry::{Rect, Size};
use crate::overlay::OverlayState;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close request.
    Quit,
    Key(Key),
    PointerDown { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Advance,
    Quit,
    Handled,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleSlideshow,
    ToggleTransitions,
    ToggleTag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Button,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub rect: Rect,
    pub kind: WidgetKind,
    pub action: Action,
}

impl Widget {
    pub fn label(&self, state: &OverlayState) -> String {
        match &self.action {
            Action::ToggleSlideshow => String::new(),
            Action::ToggleTransitions => {
                let on = if state.settings.transitions_enabled { "On" } else { "Off" };
                format!("Transitions: {}", on)
            }
            Action::ToggleTag(tag) => tag.clone(),
        }
    }

    pub fn is_ticked(&self, state: &OverlayState) -> bool {
        match &self.action {
            Action::ToggleSlideshow => state.settings.slideshow_enabled,
            Action::ToggleTransitions => state.settings.transitions_enabled,
            Action::ToggleTag(tag) => state.settings.tag_filters.get(tag).copied().unwrap_or(true),
        }
    }
}

/// Applies a widget action, then persists the settings right away.
pub fn apply_action(action: &Action, state: &mut OverlayState, store: &mut dyn SettingsStore, now: Instant) {
    let settings = &mut state.settings;
    match action {
        Action::ToggleSlideshow => settings.slideshow_enabled = !settings.slideshow_enabled,
        Action::ToggleTransitions => settings.transitions_enabled = !settings.transitions_enabled,
        Action::ToggleTag(tag) => {
            let enabled = settings.tag_filters.entry(tag.clone()).or_insert(true);
            *enabled = !*enabled;
        }
    }
    state.last_shown = Some(now);

    if let Err(e) = store.save(&state.settings) {
        warn!("Failed to save settings: {:#}", e);
    }
}

pub struct InputRouter {
    display: Size,
    right_tap_fraction: f64,
    slideshow_button: Rect,
    widgets: Vec<Widget>,
}

impl InputRouter {
    /// Lays out the control UI: the two buttons along the bottom edge and one
    /// checkbox per tag stacked above them.
    pub fn new<'a>(display: Size, right_tap_fraction: f64, tags: impl IntoIterator<Item = &'a String>) -> Self {
        let row = display.h - 72;
        let slideshow_button = Rect::new(24, row, 48, 48);
        let mut widgets = vec![
            Widget { rect: slideshow_button, kind: WidgetKind::Button, action: Action::ToggleSlideshow },
            Widget { rect: Rect::new(80, row, 200, 48), kind: WidgetKind::Button, action: Action::ToggleTransitions },
        ];
        for (i, tag) in tags.into_iter().enumerate() {
            let y = row - 40 * (i as i32 + 1);
            if y < 0 {
                warn!("No room left on screen for the '{}' tag filter", tag);
                break;
            }
            widgets.push(Widget {
                rect: Rect::new(24, y, 28, 28),
                kind: WidgetKind::Checkbox,
                action: Action::ToggleTag(tag.clone()),
            });
        }
        Self { display, right_tap_fraction, slideshow_button, widgets }
    }

    /// Where the play/pause icon goes.
    pub fn slideshow_button(&self) -> Rect {
        self.slideshow_button
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn display(&self) -> Size {
        self.display
    }

    /// Strip along the right edge that skips to the next item.
    pub fn right_tap_area(&self) -> Rect {
        let width = (self.display.w as f64 * self.right_tap_fraction).round() as i32;
        Rect::new(self.display.w - width, 0, width, self.display.h)
    }

    fn in_right_tap_area(&self, x: i32) -> bool {
        x as f64 >= self.display.w as f64 * (1.0 - self.right_tap_fraction)
    }

    fn in_bottom_third(&self, y: i32) -> bool {
        y >= self.display.h - self.display.h / 3
    }

    pub fn route(&self, event: &InputEvent, state: &mut OverlayState, store: &mut dyn SettingsStore, now: Instant) -> Routed {
        let routed = match *event {
            InputEvent::Quit | InputEvent::Key(Key::Escape) => Routed::Quit,
            InputEvent::PointerDown { x, y } => {
                let revealed = self.in_bottom_third(y);
                if revealed {
                    state.show(now);
                }

                if self.in_right_tap_area(x) {
                    Routed::Advance
                } else if let Some(widget) = self.widgets.iter().find(|w| w.rect.contains(x, y)) {
                    apply_action(&widget.action, state, store, now);
                    Routed::Handled
                } else if revealed {
                    Routed::Handled
                } else {
                    Routed::Ignored
                }
            }
            InputEvent::Key(Key::Right) => Routed::Advance,
            InputEvent::Key(Key::Other) => Routed::Ignored,
        };
        debug!("{:?} -> {:?}", event, routed);
        routed
    }
}
