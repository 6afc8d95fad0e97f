//! History Store - Bounded per-BSSID sample windows
//!
//! Mỗi BSSID giữ tối đa `HISTORY_CAPACITY` samples (FIFO).
//! Owned by the pipeline; never shared with consumers.
//!
//! Entries are never purged: an identity that disappears simply stops
//! being updated. Memory is bounded by the number of distinct BSSIDs seen.

use std::collections::{HashMap, VecDeque};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Samples retained per identity
pub const HISTORY_CAPACITY: usize = 20;

// ============================================================================
// SAMPLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp (milliseconds)
    pub timestamp_ms: i64,
    pub signal: u8,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default)]
pub struct HistoryStore {
    records: HashMap<String, VecDeque<Sample>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, evicting the oldest beyond capacity.
    ///
    /// A timestamp older than the newest stored sample is clamped forward so
    /// the window stays in non-decreasing order.
    pub fn record_sample(
        &mut self,
        bssid: &str,
        timestamp_ms: i64,
        signal: u8,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) {
        let window = self
            .records
            .entry(bssid.to_string())
            .or_insert_with(|| VecDeque::with_capacity(HISTORY_CAPACITY));

        let timestamp_ms = match window.back() {
            Some(last) if last.timestamp_ms > timestamp_ms => last.timestamp_ms,
            _ => timestamp_ms,
        };

        window.push_back(Sample {
            timestamp_ms,
            signal,
            latitude,
            longitude,
        });

        while window.len() > HISTORY_CAPACITY {
            window.pop_front();
        }
    }

    /// Ordered window for an identity (oldest first), empty if never seen
    pub fn history(&self, bssid: &str) -> Vec<Sample> {
        self.records
            .get(bssid)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, bssid: &str) -> usize {
        self.records.get(bssid).map_or(0, |w| w.len())
    }

    pub fn contains(&self, bssid: &str) -> bool {
        self.records.contains_key(bssid)
    }

    /// Number of distinct identities tracked
    pub fn identity_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_keeps_last_twenty() {
        let mut store = HistoryStore::new();
        for i in 0..25 {
            store.record_sample("AA:BB:CC:DD:EE:FF", i * 1000, i as u8, None, None);
        }

        let window = store.history("AA:BB:CC:DD:EE:FF");
        assert_eq!(window.len(), HISTORY_CAPACITY);
        let signals: Vec<u8> = window.iter().map(|s| s.signal).collect();
        assert_eq!(signals, (5..25).map(|i| i as u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut store = HistoryStore::new();
        store.record_sample("X", 5_000, 10, None, None);
        store.record_sample("X", 3_000, 20, None, None);
        store.record_sample("X", 7_000, 30, None, None);

        let ts: Vec<i64> = store.history("X").iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(ts, vec![5_000, 5_000, 7_000]);
    }

    #[test]
    fn test_identities_are_independent() {
        let mut store = HistoryStore::new();
        store.record_sample("A", 0, 10, Some(1.0), Some(2.0));
        store.record_sample("B", 0, 20, None, None);

        assert_eq!(store.len("A"), 1);
        assert_eq!(store.len("B"), 1);
        assert!(store.history("C").is_empty());
        assert_eq!(store.identity_count(), 2);
    }
}
