use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Result, anyhow, bail};
use log::{info, warn};
use raylib::prelude::*;

use crate::constants::ICON_NAMES;
use crate::geometry::{self, Rect, Size};
use crate::input::{InputEvent, Key};
use crate::scene::{DrawCmd, Scene};
use crate::screen::Screen;
use crate::texture_loader::load_texture_with_exif_rotation;

fn rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

fn texture_size(texture: &Texture2D) -> Size {
    Size::new(texture.width(), texture.height())
}

/// Control icons loaded from `<dir>/<name>.png`.
pub struct IconSet {
    textures: HashMap<&'static str, Texture2D>,
}

impl IconSet {
    pub fn load(rl: &mut RaylibHandle, thread: &RaylibThread, dir: &Path) -> Self {
        let mut textures = HashMap::new();
        for name in ICON_NAMES {
            let path = dir.join(format!("{}.png", name));
            match rl.load_texture(thread, &path.to_string_lossy()) {
                Ok(texture) => {
                    textures.insert(name, texture);
                }
                Err(e) => warn!("Icon {} unavailable: {}", path.display(), e),
            }
        }
        Self { textures }
    }

    pub fn icon(&self, name: &str) -> Option<&Texture2D> {
        self.textures.get(name)
    }
}

/// Fullscreen raylib window backing the [`Screen`] boundary.
pub struct RaylibScreen {
    rl: RaylibHandle,
    thread: RaylibThread,
    size: Size,
    photo: Option<Texture2D>,
    video: Option<Texture2D>,
    splash: Option<Texture2D>,
    icons: IconSet,
}

impl RaylibScreen {
    pub fn open(size: Size, windowed: bool, icons: &Path, splash: Option<&Path>) -> Result<Self> {
        let mut builder = raylib::init();
        builder.size(size.w, size.h).title("Photo Frame").vsync();
        if !windowed {
            builder.undecorated().fullscreen();
        }
        let (mut rl, thread) = builder.build();
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);
        rl.set_exit_key(None);
        if !windowed {
            rl.hide_cursor();
        }
        info!("Opened {}x{} display", size.w, size.h);

        let icons = IconSet::load(&mut rl, &thread, icons);
        let splash = match splash {
            Some(path) => match load_texture_with_exif_rotation(&mut rl, &thread, path) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    warn!("Splash image unavailable: {:#}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self { rl, thread, size, photo: None, video: None, splash, icons })
    }

    fn draw_splash(d: &mut RaylibDrawHandle, size: Size, splash: Option<&Texture2D>, alpha: u8) {
        d.draw_rectangle(0, 0, size.w, size.h, Color::new(0, 0, 0, alpha));
        match splash {
            Some(texture) => {
                let tex = texture_size(texture);
                let dest = geometry::fit(tex, size).clip(&size.rect());
                let source = Rectangle::new(0.0, 0.0, tex.w as f32, tex.h as f32);
                d.draw_texture_pro(texture, source, rectangle(dest), Vector2::zero(), 0.0, Color::new(255, 255, 255, alpha));
            }
            None => {
                let (cx, cy) = size.center();
                d.draw_text("Digital Photo Frame", cx - 150, cy - 20, 40, Color::new(255, 255, 255, alpha));
            }
        }
    }
}

impl Screen for RaylibScreen {
    fn size(&self) -> Size {
        self.size
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn set_tick_rate(&mut self, fps: u32) {
        self.rl.set_target_fps(fps);
    }

    fn load_photo(&mut self, path: &Path) -> Result<Size> {
        // Replacing the option unloads the previous photo's texture
        self.photo = None;
        let texture = load_texture_with_exif_rotation(&mut self.rl, &self.thread, path)?;
        let size = texture_size(&texture);
        self.photo = Some(texture);
        Ok(size)
    }

    fn upload_video_frame(&mut self, rgba: &[u8], size: Size) -> Result<()> {
        if rgba.len() != (size.w * size.h * 4) as usize {
            bail!("Video frame of {} bytes does not match {}x{}", rgba.len(), size.w, size.h);
        }
        if self.video.as_ref().map(texture_size) != Some(size) {
            let blank = Image::gen_image_color(size.w, size.h, Color::BLACK);
            let texture = self
                .rl
                .load_texture_from_image(&self.thread, &blank)
                .map_err(|e| anyhow!("Failed to create video texture: {}", e))?;
            self.video = Some(texture);
        }
        match self.video.as_mut() {
            Some(texture) => texture.update_texture(rgba).map_err(|e| anyhow!("Failed to upload video frame: {}", e)),
            None => bail!("Video texture missing"),
        }
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.rl.window_should_close() {
            events.push(InputEvent::Quit);
        }
        while let Some(key) = self.rl.get_key_pressed() {
            events.push(InputEvent::Key(match key {
                KeyboardKey::KEY_ESCAPE => Key::Escape,
                KeyboardKey::KEY_RIGHT => Key::Right,
                _ => Key::Other,
            }));
        }
        if self.rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let position = self.rl.get_mouse_position();
            events.push(InputEvent::PointerDown { x: position.x as i32, y: position.y as i32 });
        }
        events
    }

    fn present(&mut self, scene: &Scene) {
        let size = self.size;
        let mut d = self.rl.begin_drawing(&self.thread);
        for cmd in scene.cmds() {
            match cmd {
                DrawCmd::Clear(color) => d.clear_background(*color),
                DrawCmd::Photo(frame) if !frame.dest.is_empty() => {
                    if let Some(texture) = &self.photo {
                        let (x, y, w, h) = frame.source_in(texture_size(texture));
                        let source = Rectangle::new(x, y, w, h);
                        d.draw_texture_pro(texture, source, rectangle(frame.dest), Vector2::zero(), 0.0, Color::WHITE);
                    }
                }
                DrawCmd::Photo(_) => {}
                DrawCmd::VideoFrame(dest) => {
                    if let Some(texture) = &self.video {
                        let tex = texture_size(texture);
                        let source = Rectangle::new(0.0, 0.0, tex.w as f32, tex.h as f32);
                        d.draw_texture_pro(texture, source, rectangle(*dest), Vector2::zero(), 0.0, Color::WHITE);
                    }
                }
                DrawCmd::Fill { rect, color } => d.draw_rectangle(rect.x, rect.y, rect.w, rect.h, *color),
                DrawCmd::Outline { rect, thickness, color } => {
                    d.draw_rectangle_lines_ex(rectangle(*rect), *thickness as f32, *color)
                }
                DrawCmd::Text { text, x, y, size, color } => d.draw_text(text, *x, *y, *size, *color),
                DrawCmd::Icon { name, x, y } => {
                    if let Some(texture) = self.icons.icon(name) {
                        d.draw_texture(texture, *x, *y, Color::WHITE);
                    }
                }
                DrawCmd::Splash { alpha } => Self::draw_splash(&mut d, size, self.splash.as_ref(), *alpha),
            }
        }
    }
}
