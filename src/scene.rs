use raylib::prelude::Color;

use crate::effect::Frame;
use crate::geometry::Rect;

/// One drawing step of a tick, executed in order by the screen on present.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    /// The session's photo, cropped and scaled as described by the frame.
    Photo(Frame),
    /// Latest decoded video frame, stretched over `dest`.
    VideoFrame(Rect),
    Fill { rect: Rect, color: Color },
    Outline { rect: Rect, thickness: i32, color: Color },
    Text { text: String, x: i32, y: i32, size: i32, color: Color },
    Icon { name: &'static str, x: i32, y: i32 },
    /// Startup splash over the whole display.
    Splash { alpha: u8 },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scene {
    cmds: Vec<DrawCmd>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn text(&mut self, text: impl Into<String>, x: i32, y: i32, size: i32, color: Color) {
        self.push(DrawCmd::Text { text: text.into(), x, y, size, color });
    }

    #[cfg(test)]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.cmds.iter().any(|cmd| matches!(cmd, DrawCmd::Text { text, .. } if text.contains(needle)))
    }
}
