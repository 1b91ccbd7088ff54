use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::geometry::Size;
use crate::input::InputEvent;
use crate::scene::Scene;

/// Platform boundary of the frame: a fixed-size presentable surface, a polled
/// input queue and a monotonic clock.
pub trait Screen {
    fn size(&self) -> Size;
    fn now(&self) -> Instant;
    /// Caps the rate at which `present` returns.
    fn set_tick_rate(&mut self, fps: u32);
    /// Loads a photo as the current media and returns its pixel size.
    fn load_photo(&mut self, path: &Path) -> Result<Size>;
    fn upload_video_frame(&mut self, rgba: &[u8], size: Size) -> Result<()>;
    fn poll_events(&mut self) -> Vec<InputEvent>;
    fn present(&mut self, scene: &Scene);
}
