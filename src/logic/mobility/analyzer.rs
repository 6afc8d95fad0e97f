//! Mobility & Pacing Analyzer
//!
//! Input: current Verdict, History window, observer speed
//! Output: Assessment (flags + possibly escalated verdict)

use serde::{Deserialize, Serialize};

use super::rules::{MobilityThresholds, PACING_LABEL};
use crate::logic::history::Sample;
use crate::logic::threat::{Confidence, Verdict};

// ============================================================================
// ASSESSMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub is_mobile: bool,
    pub is_pacing: bool,
    /// Classifier verdict, overridden when pacing applies
    pub verdict: Verdict,
}

/// Window statistics used by both rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub signal_mean: f64,
    pub signal_variance: f64,
    /// Scaled latitude variance, `None` when fewer than 2 located samples
    pub lat_variance_scaled: Option<f64>,
    pub span_secs: f64,
}

// ============================================================================
// MAIN ANALYSIS FUNCTION
// ============================================================================

pub fn analyze(
    verdict: &Verdict,
    history: &[Sample],
    observer_speed: Option<f64>,
    thresholds: &MobilityThresholds,
) -> Assessment {
    let Some(stats) = window_stats(history, thresholds) else {
        return Assessment {
            is_mobile: false,
            is_pacing: false,
            verdict: verdict.clone(),
        };
    };

    let is_mobile = is_mobile(&stats, thresholds);
    let is_pacing = is_pacing(&stats, observer_speed.unwrap_or(0.0), thresholds);

    let verdict = if is_pacing {
        Verdict::threat(PACING_LABEL, Confidence::High)
    } else {
        verdict.clone()
    };

    Assessment {
        is_mobile,
        is_pacing,
        verdict,
    }
}

/// Statistics over the window, `None` during cold start
pub fn window_stats(history: &[Sample], thresholds: &MobilityThresholds) -> Option<WindowStats> {
    if history.len() < thresholds.min_samples.max(1) {
        return None;
    }

    let signals: Vec<f64> = history.iter().map(|s| s.signal as f64).collect();
    let (signal_mean, signal_variance) = mean_variance(&signals)?;

    let latitudes: Vec<f64> = history.iter().filter_map(|s| s.latitude).collect();
    let lat_variance_scaled = if latitudes.len() >= 2 {
        mean_variance(&latitudes).map(|(_, var)| var * thresholds.lat_variance_scale)
    } else {
        None
    };

    let first = history.first()?.timestamp_ms;
    let last = history.last()?.timestamp_ms;
    let span_secs = (last - first).max(0) as f64 / 1000.0;

    Some(WindowStats {
        signal_mean,
        signal_variance,
        lat_variance_scaled,
        span_secs,
    })
}

// ============================================================================
// RULES
// ============================================================================

/// (a) observer still, signal swinging -> the target moved
/// (b) observer moving, signal locked -> the target moves with us
fn is_mobile(stats: &WindowStats, t: &MobilityThresholds) -> bool {
    let Some(lat_var) = stats.lat_variance_scaled else {
        return false;
    };

    let target_moved = lat_var < t.observer_stationary_max
        && stats.signal_variance > t.signal_variance_high;
    let moving_with_us = lat_var > t.observer_moving_min
        && stats.signal_variance < t.signal_variance_low;

    target_moved || moving_with_us
}

fn is_pacing(stats: &WindowStats, speed_mps: f64, t: &MobilityThresholds) -> bool {
    speed_mps > t.pacing_speed_min_mps
        && stats.signal_mean > t.pacing_signal_mean_min
        && stats.span_secs > t.pacing_duration_min_secs
}

/// Population mean and variance
fn mean_variance(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance))
}
