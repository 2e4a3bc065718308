use crate::mask::buffer::PixelBuffer;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Whole-buffer snapshots for undo/redo. `past` holds at most `limit`
/// entries, oldest evicted first; every push onto `past` is bounded, including
/// the ones made by `redo`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStack {
    past: VecDeque<PixelBuffer>,
    future: Vec<PixelBuffer>,
    limit: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryStack {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.saturating_add(1)),
            future: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.evict();
    }

    /// Snapshots `buffer` as the newest undo entry and drops all redo entries.
    pub fn record(&mut self, buffer: &PixelBuffer) {
        self.push_past(buffer.clone());
        self.future.clear();
    }

    pub fn undo(&mut self, buffer: &mut PixelBuffer) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        self.future.push(std::mem::replace(buffer, previous));
        true
    }

    pub fn redo(&mut self, buffer: &mut PixelBuffer) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(buffer, next);
        self.push_past(current);
        true
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Bytes held by all snapshots.
    pub fn memory_usage(&self) -> usize {
        self.past
            .iter()
            .chain(self.future.iter())
            .map(PixelBuffer::byte_len)
            .sum()
    }

    fn push_past(&mut self, snapshot: PixelBuffer) {
        self.past.push_back(snapshot);
        self.evict();
    }

    fn evict(&mut self) {
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
