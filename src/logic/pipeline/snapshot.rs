//! Target Snapshot
//!
//! The producer publishes an immutable snapshot per cycle by swapping an
//! `Arc`; consumers clone the `Arc` and never see a half-built list. The
//! write lock is held only for the pointer swap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::logic::threat::Target;

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Published cycle number, 0 = nothing published yet
    pub cycle: u64,
    pub taken_at: Option<DateTime<Utc>>,
    pub targets: Arc<Vec<Target>>,
}

impl Snapshot {
    pub fn new(cycle: u64, taken_at: DateTime<Utc>, targets: Arc<Vec<Target>>) -> Self {
        Self {
            cycle,
            taken_at: Some(taken_at),
            targets,
        }
    }

    pub fn threat_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_threat).count()
    }

    /// Threats first, then strongest signal
    pub fn sorted_for_display(&self) -> Vec<&Target> {
        let mut sorted: Vec<&Target> = self.targets.iter().collect();
        sorted.sort_by(|a, b| b.is_threat.cmp(&a.is_threat).then(b.signal.cmp(&a.signal)));
        sorted
    }
}

/// Shared handle, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        *self.inner.write() = next;
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::observation::{Band, Observation};
    use crate::logic::threat::{Confidence, Verdict};

    fn target(ssid: &str, signal: u8, threat: bool) -> Target {
        let obs = Observation::new(ssid, "AA:BB:CC:DD:EE:FF", signal, Band::Ghz2_4);
        let mut t = Target::from_observation(&obs, obs.bssid.clone());
        if threat {
            t.apply_verdict(&Verdict::threat("[X]", Confidence::Low));
        }
        t
    }

    #[test]
    fn test_publish_swaps_whole_list() {
        let handle = SnapshotHandle::new();
        assert_eq!(handle.latest().cycle, 0);

        let held = handle.latest();
        handle.publish(Snapshot::new(1, Utc::now(), Arc::new(vec![target("A", 50, false)])));

        // old readers keep their copy
        assert!(held.targets.is_empty());
        assert_eq!(handle.latest().cycle, 1);
        assert_eq!(handle.latest().targets.len(), 1);
    }

    #[test]
    fn test_display_order() {
        let snap = Snapshot::new(
            1,
            Utc::now(),
            Arc::new(vec![
                target("weak", 20, false),
                target("strong", 90, false),
                target("threat", 30, true),
            ]),
        );

        let names: Vec<&str> = snap.sorted_for_display().iter().map(|t| t.ssid.as_str()).collect();
        assert_eq!(names, vec!["threat", "strong", "weak"]);
        assert_eq!(snap.threat_count(), 1);
    }

    #[test]
    fn test_concurrent_readers() {
        let handle = SnapshotHandle::new();
        let reader = handle.clone();

        let t = std::thread::spawn(move || {
            let mut max_seen = 0;
            for _ in 0..1000 {
                let snap = reader.latest();
                // a snapshot is always internally consistent
                assert_eq!(snap.targets.len() as u64, snap.cycle);
                max_seen = max_seen.max(snap.cycle);
            }
            max_seen
        });

        for cycle in 1..=50u64 {
            let targets = (0..cycle).map(|_| target("A", 50, false)).collect();
            handle.publish(Snapshot::new(cycle, Utc::now(), Arc::new(targets)));
        }

        assert!(t.join().unwrap() <= 50);
    }
}
