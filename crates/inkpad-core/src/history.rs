//! Undo/redo history of committed scenes.

use crate::scene::Scene;
use thiserror::Error;

/// Errors for histories assembled from outside parts (e.g. storage).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("History must contain at least one scene")]
    Empty,
    #[error("Cursor {cursor} is out of range for {len} entries")]
    CursorOutOfRange { cursor: usize, len: usize },
}

/// Linear history of committed scenes plus the cursor of the visible one.
///
/// Invariants: `entries` is never empty and `cursor < entries.len()`.
/// Entries after the cursor are the redo-able future.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Scene>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// A history holding only the empty scene.
    pub fn new() -> Self {
        Self {
            entries: vec![Scene::empty()],
            cursor: 0,
        }
    }

    /// Rebuild a history, checking its invariants.
    pub fn from_parts(entries: Vec<Scene>, cursor: usize) -> Result<Self, HistoryError> {
        if entries.is_empty() {
            return Err(HistoryError::Empty);
        }
        if cursor >= entries.len() {
            return Err(HistoryError::CursorOutOfRange {
                cursor,
                len: entries.len(),
            });
        }
        Ok(Self { entries, cursor })
    }

    /// Append a scene after the cursor, discarding any redo-able future.
    ///
    /// Unconditional: a scene equal to the current one still becomes a new entry.
    pub fn commit(&mut self, scene: Scene) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(scene);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. Returns false (and changes nothing) at the first entry.
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one entry. Returns false (and changes nothing) at the last entry.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// The scene at the cursor.
    pub fn current(&self) -> &Scene {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[Scene] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a history built through this API.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the oldest entries so at most `max_entries` remain.
    ///
    /// The cursor keeps pointing at the same scene unless that scene itself
    /// was dropped, in which case it lands on the oldest survivor.
    pub fn trim_to(&mut self, max_entries: usize) -> usize {
        let max_entries = max_entries.max(1);
        let excess = self.entries.len().saturating_sub(max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
        excess
    }
}
