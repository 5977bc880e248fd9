//! Bounded alert history.
//!
//! Holds the most recent [`EVENT_LOG_CAPACITY`] alerts, newest first.
//! Insertion is always at the head; once full, the oldest entry is
//! evicted from the tail.  Backed by a fixed-capacity `heapless::Deque`
//! so the bound is enforced by the type, not by a truncate call.

use heapless::Deque;

use crate::alerts::AlertEvent;

/// Maximum number of alerts retained.
pub const EVENT_LOG_CAPACITY: usize = 25;

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Deque<AlertEvent, EVENT_LOG_CAPACITY>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `event` at the head, dropping the oldest entry if full.
    pub fn append(&mut self, event: AlertEvent) {
        if self.entries.is_full() {
            self.entries.pop_back();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.entries.push_front(event);
    }

    /// Most recent alert, if any.
    pub fn latest(&self) -> Option<&AlertEvent> {
        self.entries.front()
    }

    /// Iterate newest → oldest.
    pub fn iter(&self) -> impl Iterator<Item = &AlertEvent> {
        self.entries.iter()
    }

    /// Owned copy, newest first (for handing to a display layer).
    pub fn to_vec(&self) -> Vec<AlertEvent> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        EVENT_LOG_CAPACITY
    }
}
