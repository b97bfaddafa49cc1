use crate::models::HistoryEntry;

use super::error::EngineError;

/// LIFO log of completed actions. Popping only reports an entry; it never
/// reverses what the entry describes.
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make sure the next [`HistoryStack::push`] will not need to allocate.
    pub fn reserve_one(&mut self) -> Result<(), EngineError> {
        self.entries
            .try_reserve(1)
            .map_err(|_| EngineError::ResourceExhausted("action history"))
    }

    /// Record `action`, silently truncated to the bounded entry length.
    pub fn push(&mut self, action: &str) {
        self.entries.push(HistoryEntry::new(action));
    }

    /// Remove the most recent entry. `None` means there is nothing to undo.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Entries from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().rev()
    }

    pub fn drain(&mut self) -> usize {
        let discarded = self.entries.len();
        self.entries = Vec::new();
        discarded
    }
}
