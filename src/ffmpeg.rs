use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::geometry::Size;

/// Sequential source of RGBA video frames.
pub trait FrameSource {
    fn frame_size(&self) -> Size;
    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<&[u8]>>;
}

/// Decodes a video with an `ffmpeg` child process writing raw RGBA frames to a pipe.
///
/// Frames come out already scaled and cropped to cover `size`, so no letterbox.
pub struct Ffmpeg {
    process: Child,
    stdout: Option<ChildStdout>,
    size: Size,
    frame: Vec<u8>,
}

impl Ffmpeg {
    pub fn open(path: &Path, size: Size) -> Result<Ffmpeg> {
        let filter = format!(
            "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h}",
            w = size.w,
            h = size.h
        );
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .args(["-vf", &filter])
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgba"])
            .arg("-")
            .spawn()
            .context("Failed to start ffmpeg process")?;
        let stdout = process.stdout.take().context("Failed to open ffmpeg stdout")?;
        debug!("ffmpeg decoding {} at {}x{}", path.display(), size.w, size.h);

        Ok(Ffmpeg {
            process,
            stdout: Some(stdout),
            size,
            frame: vec![0; (size.w * size.h * 4) as usize],
        })
    }
}

impl FrameSource for Ffmpeg {
    fn frame_size(&self) -> Size {
        self.size
    }

    fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        match stdout.read_exact(&mut self.frame) {
            Ok(()) => Ok(Some(&self.frame)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.stdout = None;
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read frame from ffmpeg"),
        }
    }
}

impl Drop for Ffmpeg {
    fn drop(&mut self) {
        // Close the pipe first; a session ended early still has ffmpeg writing
        self.stdout = None;
        if let Err(e) = self.process.kill() {
            debug!("ffmpeg already exited: {}", e);
        }
        if let Err(e) = self.process.wait() {
            warn!("Failed to wait for ffmpeg process: {}", e);
        }
    }
}
