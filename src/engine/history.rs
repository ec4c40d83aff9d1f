//! Bounded trailing history of scoring snapshots.

use crate::utils::types::Snapshot;
use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Snapshots retained for the trend view. Appending past this evicts the
/// oldest entry.
pub const HISTORY_CAPACITY: usize = 10;

/// FIFO ring of the most recent snapshots, in append (time) order.
///
/// Not synchronized on its own – mutation is confined to the engine's single
/// writer role.
pub struct History {
    buf: AllocRingBuffer<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self { buf: AllocRingBuffer::new(HISTORY_CAPACITY) }
    }

    /// Push a snapshot onto the back, dropping the front when over capacity.
    pub fn append(&mut self, snapshot: Snapshot) {
        self.buf.enqueue(snapshot);
    }

    /// Most recently appended snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.buf.iter().last()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Copy of the retained snapshots, oldest first.
    pub fn to_vec(&self) -> Vec<Snapshot> {
        self.buf.iter().cloned().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::{DomainSet, ScoreLabel, Snapshot};
    use chrono::{TimeZone, Utc};

    fn snapshot(score: u8) -> Snapshot {
        Snapshot {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, u32::from(score)).unwrap(),
            score,
            label: ScoreLabel::from_score(score),
            domains: DomainSet::all_fallback(),
            degraded: Vec::new(),
        }
    }

    #[test]
    fn starts_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.to_vec().is_empty());
    }

    #[test]
    fn keeps_append_order_up_to_capacity() {
        let mut history = History::new();
        for score in 0..HISTORY_CAPACITY as u8 {
            history.append(snapshot(score));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let scores: Vec<u8> = history.to_vec().iter().map(|s| s.score).collect();
        assert_eq!(scores, (0..HISTORY_CAPACITY as u8).collect::<Vec<_>>());
        assert_eq!(history.latest().unwrap().score, 9);
    }

    #[test]
    fn eleventh_append_evicts_the_first() {
        let mut history = History::new();
        for score in 0..=HISTORY_CAPACITY as u8 {
            history.append(snapshot(score));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);

        let scores: Vec<u8> = history.to_vec().iter().map(|s| s.score).collect();
        assert!(!scores.contains(&0), "oldest snapshot should have been evicted");
        assert_eq!(scores, (1..=HISTORY_CAPACITY as u8).collect::<Vec<_>>());
        assert_eq!(history.latest().unwrap().score, HISTORY_CAPACITY as u8);
    }
}
