//! Bounded undo/redo history of table snapshots.
//!
//! History is a list of snapshots with a cursor. Saving discards anything
//! after the cursor, appends, and moves the cursor to the new last entry.
//! When the list outgrows its capacity the oldest snapshots are evicted.
//!
//! # Usage Pattern
//!
//! 1. Call [`History::save`] with the table *before* applying an edit
//! 2. [`History::undo`] / [`History::redo`] move the cursor and return the
//!    snapshot it lands on, or the caller's current table when there is
//!    nowhere to move
//!
//! Undo stops at the oldest entry: the snapshot at index 0 is the earliest
//! state that can be restored.

use crate::settings::EngineSettings;
use crate::table::Table;
use std::collections::VecDeque;

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 50;
/// Smallest capacity accepted by [`History::set_capacity`].
pub const MIN_CAPACITY: usize = 1;
/// Largest capacity accepted by [`History::set_capacity`].
pub const MAX_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<Table>,
    /// Index into `entries`; meaningless while `entries` is empty.
    cursor: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new()
    }
}

impl History {
    pub fn new() -> Self {
        History::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty history keeping at most `capacity` snapshots, clamped to
    /// `[MIN_CAPACITY, MAX_CAPACITY]`.
    pub fn with_capacity(capacity: usize) -> Self {
        History {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.clamp(MIN_CAPACITY, MAX_CAPACITY),
        }
    }

    /// Empty history sized by `settings.max_undo_steps`.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let mut history = History::new();
        history.set_capacity(settings.max_undo_steps);
        history
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cursor position, `None` when nothing has been saved.
    pub fn cursor(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Table> {
        self.cursor().and_then(|i| self.entries.get(i))
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// Record a snapshot of `table`.
    pub fn save(&mut self, table: &Table) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(table.clone());
        self.cursor = self.entries.len() - 1;

        let evicted = self.evict();
        log::debug!(
            "history save: {} entries, cursor {}, {} evicted",
            self.entries.len(),
            self.cursor,
            evicted
        );
    }

    /// Step back one snapshot. Returns `current` when already at the oldest.
    pub fn undo(&mut self, current: &Table) -> Table {
        if !self.can_undo() {
            return current.clone();
        }
        self.cursor -= 1;
        log::debug!("history undo: cursor {}", self.cursor);
        self.entries[self.cursor].clone()
    }

    /// Step forward one snapshot. Returns `current` when already at the newest.
    pub fn redo(&mut self, current: &Table) -> Table {
        if !self.can_redo() {
            return current.clone();
        }
        self.cursor += 1;
        log::debug!("history redo: cursor {}", self.cursor);
        self.entries[self.cursor].clone()
    }

    /// Resize, evicting the oldest snapshots if the history no longer fits.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(MIN_CAPACITY, MAX_CAPACITY);
        let evicted = self.evict();
        log::debug!(
            "history capacity {}: {} entries, {} evicted",
            self.capacity,
            self.entries.len(),
            evicted
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Drop entries from the front until the list fits, shifting the cursor
    /// with them. Returns the number dropped.
    fn evict(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess > 0 {
            self.entries.drain(..excess);
            self.cursor = self
                .cursor
                .saturating_sub(excess)
                .min(self.entries.len().saturating_sub(1));
        }
        excess
    }
}
