//! Selection cursor over a [`FlatIndex`].

use crate::flatten::FlatIndex;
use rolodex_types::RecordSummary;

/// Keys the palette's navigation reacts to. Everything else is text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Home,
    End,
    Confirm,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do (e.g. confirm on an empty list)
    Ignored,
    /// Cursor now at this index
    Moved(usize),
    /// Record under the cursor was confirmed
    Commit(RecordSummary),
    /// Palette should close
    Close,
}

/// Index into the flat result list, clamped to `[0, len - 1]`. Never wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    index: usize,
}

impl SelectionCursor {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Selected index, or `None` when there is nothing to select.
    #[must_use]
    pub fn selected(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Point at `index` if it exists. Returns whether the cursor moved there.
    pub fn select(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn handle(&mut self, key: NavKey, flat: &FlatIndex) -> Transition {
        let len = flat.len();
        match key {
            NavKey::Escape => Transition::Close,
            NavKey::Confirm => self
                .selected(len)
                .and_then(|index| flat.get(index))
                .map_or(Transition::Ignored, |record| Transition::Commit(record.clone())),
            _ if len == 0 => Transition::Ignored,
            NavKey::Down => self.move_to(self.index.saturating_add(1).min(len - 1)),
            NavKey::Up => self.move_to(self.index.min(len - 1).saturating_sub(1)),
            NavKey::Home => self.move_to(0),
            NavKey::End => self.move_to(len - 1),
        }
    }

    fn move_to(&mut self, index: usize) -> Transition {
        self.index = index;
        Transition::Moved(index)
    }
}
