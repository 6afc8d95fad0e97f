//! Observation Pipeline - one scan cycle
//!
//! RECEIVE -> FILTER -> CLASSIFY -> ESTIMATE_DISTANCE -> UPDATE_HISTORY
//!         -> ANALYZE_MOBILITY -> DISPATCH_ALERTS -> EMIT
//!
//! Every stage is total. A bad observation is skipped on its own; it never
//! aborts the cycle. History and the alert ledger live here and are only
//! reachable through `&mut self`, so two cycles cannot interleave.

use chrono::{DateTime, Utc};

use crate::logic::alert::{alert_phrase, AlertDispatcher};
use crate::logic::distance::estimate_distance;
use crate::logic::history::HistoryStore;
use crate::logic::mobility::{analyze, MobilityThresholds};
use crate::logic::observation::{normalize_bssid, Observation, ObserverFix};
use crate::logic::threat::{classify, resolve_vendor, Confidence, Target};
use crate::logic::whitelist::Whitelist;

/// Result of one cycle
#[derive(Debug, Clone, Default)]
pub struct CycleOutput {
    /// Emitted targets, in batch order
    pub targets: Vec<Target>,
    /// Phrases that passed the dispatcher and must be delivered
    pub alerts: Vec<String>,
    /// Dropped by the whitelist
    pub suppressed: usize,
    /// Dropped as malformed
    pub skipped: usize,
}

pub struct ObservationPipeline {
    whitelist: Whitelist,
    thresholds: MobilityThresholds,
    history: HistoryStore,
    dispatcher: AlertDispatcher,
}

impl ObservationPipeline {
    pub fn new(whitelist: Whitelist, thresholds: MobilityThresholds) -> Self {
        Self {
            whitelist,
            thresholds,
            history: HistoryStore::new(),
            dispatcher: AlertDispatcher::default(),
        }
    }

    /// Replace the whitelist between cycles
    pub fn set_whitelist(&mut self, whitelist: Whitelist) {
        self.whitelist = whitelist;
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    /// Run one cycle. An empty batch means "no update" and returns `None`.
    ///
    /// `fix` fills any observer fields the observations do not carry.
    pub fn run_cycle(
        &mut self,
        batch: &[Observation],
        fix: ObserverFix,
        now: DateTime<Utc>,
    ) -> Option<CycleOutput> {
        if batch.is_empty() {
            return None;
        }

        let now_ms = now.timestamp_millis();
        let mut output = CycleOutput::default();

        for obs in batch {
            // FILTER
            if self.whitelist.is_suppressed(&obs.ssid, &obs.bssid) {
                output.suppressed += 1;
                continue;
            }

            let Some(bssid) = normalize_bssid(&obs.bssid) else {
                log::debug!("Skipping malformed observation: ssid={:?} bssid={:?}", obs.ssid, obs.bssid);
                output.skipped += 1;
                continue;
            };

            let target = self.process(obs, bssid, fix, now_ms, &mut output.alerts);
            output.targets.push(target);
        }

        log::debug!(
            "Cycle: {} targets, {} suppressed, {} skipped, {} alerts",
            output.targets.len(),
            output.suppressed,
            output.skipped,
            output.alerts.len()
        );

        Some(output)
    }

    fn process(
        &mut self,
        obs: &Observation,
        bssid: String,
        fix: ObserverFix,
        now_ms: i64,
        alerts: &mut Vec<String>,
    ) -> Target {
        let observer = obs.observer.or(fix);

        let mut target = Target::from_observation(obs, bssid);
        target.signal = obs.signal.min(100);
        target.observer = observer;

        // CLASSIFY
        target.vendor = resolve_vendor(&target.bssid);
        let verdict = classify(&obs.ssid, &target.bssid);

        // ESTIMATE_DISTANCE
        target.distance_m = estimate_distance(target.signal, target.band);

        // UPDATE_HISTORY
        self.history.record_sample(
            &target.bssid,
            now_ms,
            target.signal,
            observer.latitude,
            observer.longitude,
        );

        // ANALYZE_MOBILITY
        let window = self.history.history(&target.bssid);
        let assessment = analyze(&verdict, &window, observer.speed_mps, &self.thresholds);
        target.apply_verdict(&assessment.verdict);
        target.is_mobile = assessment.is_mobile;
        target.is_pacing = assessment.is_pacing;

        // DISPATCH_ALERTS
        if target.is_pacing || target.confidence == Confidence::High {
            let phrase = alert_phrase(&target);
            if self.dispatcher.maybe_announce(&target.bssid, &phrase, now_ms) {
                log::warn!(
                    "[THREAT] {} ({}) {} {} @ {:.1}m",
                    target.display_ssid(),
                    target.bssid,
                    target.threat_label,
                    target.confidence,
                    target.distance_m
                );
                alerts.push(phrase);
            }
        }

        target
    }
}

impl Default for ObservationPipeline {
    fn default() -> Self {
        Self::new(Whitelist::default(), MobilityThresholds::default())
    }
}
