use std::path::Path;

use anyhow::{Context, Result, ensure};
use log::{info, warn};
use rand::Rng;

use crate::catalog::{MediaItem, MediaKind};
use crate::ffmpeg::FrameSource;
use crate::geometry::Size;
use crate::playback::{Outcome, Stage, play_image, play_video};
use crate::screen::Screen;
use crate::sequencer::Sequencer;

fn next_item(sequencer: &mut Sequencer, stage: &Stage) -> Option<MediaItem> {
    if let Some(item) = sequencer.advance(&stage.state.settings) {
        return Some(item.clone());
    }
    warn!("Every item is filtered out by tags, ignoring the filters");
    sequencer.advance_unfiltered().cloned()
}

/// Main loop: plays items in shuffled order until the viewer quits.
///
/// When a session expires with the slideshow paused the same item starts over.
pub fn run<S: Screen, R: Rng>(
    screen: &mut S,
    stage: &mut Stage,
    items: Vec<MediaItem>,
    rng: &mut R,
    open_video: &mut dyn FnMut(&Path, Size) -> Result<Box<dyn FrameSource>>,
) -> Result<()> {
    ensure!(!items.is_empty(), "No photos or videos to show");
    let mut sequencer = Sequencer::new(items, &mut *rng);
    info!("Playing {} items", sequencer.len());
    let mut item = next_item(&mut sequencer, stage).context("No photos or videos to show")?;

    loop {
        let outcome = match item.kind {
            MediaKind::Image => play_image(screen, stage, &item, &mut *rng),
            MediaKind::Video => play_video(screen, stage, &item, open_video),
        }
        .with_context(|| format!("Failed to play {}", item.path.display()))?;

        match outcome {
            Outcome::Quit => {
                info!("Quit requested");
                return Ok(());
            }
            Outcome::Expired if !stage.state.settings.slideshow_enabled => {}
            Outcome::Expired | Outcome::Advanced => {
                item = next_item(&mut sequencer, stage).context("No photos or videos to show")?;
            }
        }
    }
}
