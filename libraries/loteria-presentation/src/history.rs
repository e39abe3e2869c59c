//! Bounded reveal history for renderers
//!
//! The session keeps the complete reveal order. Renderers only show the
//! most recent entries and must release whatever they allocated for older
//! ones, so `push` hands evicted entries back.

use crate::types::Card;
use std::collections::VecDeque;

/// Most-recent-first window over revealed entries
#[derive(Debug, Clone)]
pub struct RevealHistory<T = Card> {
    /// Entries, most recent = front
    entries: VecDeque<T>,

    /// Maximum visible entries
    max_size: usize,

    /// Entries ever pushed since the last clear
    total: usize,
}

impl<T> RevealHistory<T> {
    /// Create a window keeping at most `max_size` entries (minimum 1)
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
            total: 0,
        }
    }

    /// Add the newest entry
    ///
    /// Returns entries evicted from the window, oldest last.
    pub fn push(&mut self, entry: T) -> Vec<T> {
        self.entries.push_front(entry);
        self.total += 1;

        let mut evicted = Vec::new();
        while self.entries.len() > self.max_size {
            if let Some(old) = self.entries.pop_back() {
                evicted.push(old);
            }
        }
        evicted
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Visible entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries pushed since the last clear, evicted ones included
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drop all entries, returning them most recent first
    pub fn clear(&mut self) -> Vec<T> {
        self.total = 0;
        self.entries.drain(..).collect()
    }
}

impl<T> Default for RevealHistory<T> {
    fn default() -> Self {
        Self::new(15)
    }
}
