//! Headless Status Consumer
//!
//! Polls the published snapshot on its own cadence and logs a summary when a
//! new cycle appears. Never blocks the producer: it only clones an `Arc`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::logic::distance::proximity_hint;
use crate::logic::pipeline::{Snapshot, SnapshotHandle};

/// Rows shown per summary
pub const STATUS_TOP_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub cycle: u64,
    pub taken_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub threats: usize,
    pub mobile: usize,
    pub pacing: usize,
    /// Display-ordered rows, at most `STATUS_TOP_ROWS`
    pub rows: Vec<StatusRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub ssid: String,
    pub bssid: String,
    pub signal: u8,
    pub distance_m: f64,
    pub proximity: &'static str,
    pub label: String,
}

pub fn summarize(snapshot: &Snapshot, limit: usize) -> StatusReport {
    let targets = snapshot.targets.as_slice();

    let rows = snapshot
        .sorted_for_display()
        .into_iter()
        .take(limit)
        .map(|t| StatusRow {
            ssid: t.display_ssid().to_string(),
            bssid: t.bssid.clone(),
            signal: t.signal,
            distance_m: t.distance_m,
            proximity: proximity_hint(t.signal, t.band).as_str(),
            label: t.threat_label.clone(),
        })
        .collect();

    StatusReport {
        cycle: snapshot.cycle,
        taken_at: snapshot.taken_at,
        total: targets.len(),
        threats: snapshot.threat_count(),
        mobile: targets.iter().filter(|t| t.is_mobile).count(),
        pacing: targets.iter().filter(|t| t.is_pacing).count(),
        rows,
    }
}

fn log_report(report: &StatusReport) {
    let at = report
        .taken_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    log::info!(
        "Cycle {} @ {}: {} targets, {} threats, {} mobile, {} pacing",
        report.cycle,
        at,
        report.total,
        report.threats,
        report.mobile,
        report.pacing
    );
    for row in &report.rows {
        log::info!(
            "   {:<24} {} {:>3}% {:>7.1}m {:<20} {}",
            row.ssid,
            row.bssid,
            row.signal,
            row.distance_m,
            row.proximity,
            row.label
        );
    }
}

/// Consumer loop. Returns the last cycle it reported.
pub async fn run_status_loop(
    snapshot: SnapshotHandle,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_cycle = 0;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = ticker.tick() => {}
        }

        let latest = snapshot.latest();
        if latest.cycle != last_cycle {
            last_cycle = latest.cycle;
            log_report(&summarize(&latest, STATUS_TOP_ROWS));
        }
    }

    log::debug!("Status loop stopped at cycle {}", last_cycle);
    last_cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::observation::{Band, Observation};
    use crate::logic::threat::{Confidence, Target, Verdict};
    use chrono::Utc;
    use std::sync::Arc;

    fn target(ssid: &str, signal: u8, band: Band) -> Target {
        let obs = Observation::new(ssid, "AA:BB:CC:DD:EE:FF", signal, band);
        Target::from_observation(&obs, obs.bssid.clone())
    }

    #[test]
    fn test_summary_counts_and_order() {
        let mut tail = target("", 85, Band::Ghz2_4);
        tail.apply_verdict(&Verdict::threat("[PACING]", Confidence::High));
        tail.is_pacing = true;
        tail.is_mobile = true;

        let snap = Snapshot::new(
            3,
            Utc::now(),
            Arc::new(vec![target("Cafe", 40, Band::Ghz2_4), target("Lab", 70, Band::Ghz5), tail]),
        );

        let report = summarize(&snap, 2);
        assert_eq!(report.cycle, 3);
        assert_eq!(report.taken_at, snap.taken_at);
        assert_eq!(report.total, 3);
        assert_eq!(report.threats, 1);
        assert_eq!(report.mobile, 1);
        assert_eq!(report.pacing, 1);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].ssid, "HIDDEN");
        assert_eq!(report.rows[0].proximity, "IMMEDIATE PROXIMITY");
        assert_eq!(report.rows[1].ssid, "Lab");
        assert_eq!(report.rows[1].proximity, "VERY CLOSE (5GHz)");
    }

    #[test]
    fn test_empty_snapshot() {
        let report = summarize(&Snapshot::default(), STATUS_TOP_ROWS);
        assert_eq!(report.cycle, 0);
        assert!(report.taken_at.is_none());
        assert_eq!(report.total, 0);
        assert!(report.rows.is_empty());
    }

    #[tokio::test]
    async fn test_loop_follows_snapshot_until_shutdown() {
        let handle = SnapshotHandle::new();
        let (tx, rx) = broadcast::channel(1);

        let task = tokio::spawn(run_status_loop(handle.clone(), Duration::from_millis(5), rx));

        handle.publish(Snapshot::new(1, Utc::now(), Arc::new(vec![target("A", 50, Band::Ghz2_4)])));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.publish(Snapshot::new(2, Utc::now(), Arc::new(Vec::new())));
        tokio::time::sleep(Duration::from_millis(50)).await;

        tx.send(()).unwrap();
        assert_eq!(task.await.unwrap(), 2);
    }
}
