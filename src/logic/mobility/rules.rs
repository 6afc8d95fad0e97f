//! Mobility & Pacing Thresholds
//!
//! Empirical heuristics, not physically derived. They were tuned on a
//! handful of drives and should not be assumed to generalize across radios.
//! KHÔNG chứa logic - chỉ constants và config.

use serde::{Deserialize, Serialize};

// ============================================================================
// COLD START
// ============================================================================

/// Samples required before any mobility/pacing verdict
pub const MIN_HISTORY_SAMPLES: usize = 5;

// ============================================================================
// MOBILITY
// ============================================================================

/// Latitude variance is in degrees²; scale so GPS-sized changes land near 1.0
pub const LAT_VARIANCE_SCALE: f64 = 1.0e8;

/// Scaled latitude variance below this = observer stationary (~GPS jitter)
pub const OBSERVER_STATIONARY_MAX: f64 = 0.1;

/// Scaled latitude variance above this = observer clearly moving
pub const OBSERVER_MOVING_MIN: f64 = 1.0;

/// Signal variance (percent²) above this = target signal swinging
pub const SIGNAL_VARIANCE_HIGH: f64 = 100.0;

/// Signal variance (percent²) below this = target signal locked
pub const SIGNAL_VARIANCE_LOW: f64 = 10.0;

// ============================================================================
// PACING
// ============================================================================

/// Observer speed above this (m/s) counts as vehicle motion (~16 km/h)
pub const PACING_SPEED_MIN_MPS: f64 = 4.5;

/// Mean signal over the window must exceed this (percent)
pub const PACING_SIGNAL_MEAN_MIN: f64 = 60.0;

/// Window span must exceed this (seconds)
pub const PACING_DURATION_MIN_SECS: f64 = 15.0;

/// Label forced onto pacing targets
pub const PACING_LABEL: &str = "[PACING]";

// ============================================================================
// CONFIGURABLE THRESHOLDS (for runtime adjustment)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityThresholds {
    pub min_samples: usize,
    pub lat_variance_scale: f64,
    pub observer_stationary_max: f64,
    pub observer_moving_min: f64,
    pub signal_variance_high: f64,
    pub signal_variance_low: f64,
    pub pacing_speed_min_mps: f64,
    pub pacing_signal_mean_min: f64,
    pub pacing_duration_min_secs: f64,
}

impl Default for MobilityThresholds {
    fn default() -> Self {
        Self {
            min_samples: MIN_HISTORY_SAMPLES,
            lat_variance_scale: LAT_VARIANCE_SCALE,
            observer_stationary_max: OBSERVER_STATIONARY_MAX,
            observer_moving_min: OBSERVER_MOVING_MIN,
            signal_variance_high: SIGNAL_VARIANCE_HIGH,
            signal_variance_low: SIGNAL_VARIANCE_LOW,
            pacing_speed_min_mps: PACING_SPEED_MIN_MPS,
            pacing_signal_mean_min: PACING_SIGNAL_MEAN_MIN,
            pacing_duration_min_secs: PACING_DURATION_MIN_SECS,
        }
    }
}

impl MobilityThresholds {
    /// High sensitivity - flags tailing sooner, more false positives
    pub fn high_sensitivity() -> Self {
        Self {
            signal_variance_high: 60.0,
            signal_variance_low: 20.0,
            pacing_signal_mean_min: 50.0,
            pacing_duration_min_secs: 10.0,
            ..Default::default()
        }
    }

    /// Low sensitivity - fewer alerts in dense urban traffic
    pub fn low_sensitivity() -> Self {
        Self {
            signal_variance_high: 200.0,
            signal_variance_low: 5.0,
            pacing_signal_mean_min: 70.0,
            pacing_duration_min_secs: 30.0,
            ..Default::default()
        }
    }
}
