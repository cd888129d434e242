// SPDX-License-Identifier: MPL-2.0
//! Edit history bookkeeping (undo/redo).

use crate::domain::editing::EditState;
use std::collections::VecDeque;

/// Bounded, linear undo/redo log of edit-state snapshots.
///
/// Starts with one entry (the state at editor open). The cursor points at the
/// entry that matches the live state.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<EditState>,
    cursor: usize,
    limit: usize,
}

impl EditHistory {
    /// Creates a log holding `initial`. A zero limit is raised to one.
    #[must_use]
    pub fn new(initial: EditState, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = VecDeque::with_capacity(limit);
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            limit,
        }
    }

    /// Records a snapshot after the cursor, discarding the redo branch and
    /// evicting the oldest entry when full.
    ///
    /// Returns false, recording nothing, if `snapshot` equals the current entry.
    pub fn push(&mut self, snapshot: EditState) -> bool {
        if *self.current() == snapshot {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        if self.entries.len() > self.limit {
            self.entries.pop_front();
            log::debug!("History full ({} entries), evicted oldest", self.limit);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Steps back one entry. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&EditState> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&EditState> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> &EditState {
        // The log is never empty and the cursor always indexes it.
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the initial entry is never removed by undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
