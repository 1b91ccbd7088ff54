use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::MediaItem;
use crate::settings::Settings;

/// Shuffled play order over the whole catalog.
pub struct Sequencer {
    items: Vec<MediaItem>,
    cursor: Option<usize>,
}

impl Sequencer {
    pub fn new<R: Rng>(mut items: Vec<MediaItem>, rng: &mut R) -> Self {
        items.shuffle(rng);
        Self { items, cursor: None }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Moves to the next item the tag filters allow, wrapping around.
    ///
    /// Every item is looked at most once, so a catalog where everything is
    /// filtered out gives `None` instead of spinning.
    pub fn advance(&mut self, settings: &Settings) -> Option<&MediaItem> {
        let len = self.items.len();
        let start = self.cursor.map_or(0, |i| i + 1);
        let index = (0..len).map(|step| (start + step) % len).find(|&i| settings.allows(&self.items[i].tags))?;
        self.cursor = Some(index);
        Some(&self.items[index])
    }

    /// Moves to the next item regardless of filters.
    pub fn advance_unfiltered(&mut self) -> Option<&MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        let index = self.cursor.map_or(0, |i| (i + 1) % self.items.len());
        self.cursor = Some(index);
        Some(&self.items[index])
    }
}
