//! Threat Types
//!
//! Core types cho threat classification.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

use crate::logic::observation::{Band, Observation, ObserverFix};

/// Vendor name used when the OUI is not in the signature table
pub const UNKNOWN_VENDOR: &str = "UNKNOWN";

// ============================================================================
// CONFIDENCE TIER
// ============================================================================

/// Ordered classification certainty: NONE < LOW < MED < HIGH
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    None,
    Low,
    Med,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "NONE",
            Confidence::Low => "LOW",
            Confidence::Med => "MED",
            Confidence::High => "HIGH",
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag {
            "HIGH" => Confidence::High,
            "MED" => Confidence::Med,
            "LOW" => Confidence::Low,
            _ => Confidence::None,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Classifier output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_threat: bool,
    /// Bracketed label, empty when not a threat
    pub label: String,
    pub confidence: Confidence,
}

impl Verdict {
    pub fn clear() -> Self {
        Self {
            is_threat: false,
            label: String::new(),
            confidence: Confidence::None,
        }
    }

    pub fn threat(label: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            is_threat: true,
            label: label.into(),
            confidence,
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::clear()
    }
}

// ============================================================================
// TARGET (core output)
// ============================================================================

/// One classified access point for one cycle. Recreated every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub ssid: String,
    /// Normalized BSSID
    pub bssid: String,
    pub signal: u8,
    pub band: Band,
    pub encryption: String,
    pub observer: ObserverFix,

    pub vendor: String,
    /// Estimated range in meters, 0.0 = unknown
    pub distance_m: f64,
    pub is_threat: bool,
    pub threat_label: String,
    pub confidence: Confidence,
    pub is_mobile: bool,
    pub is_pacing: bool,
}

impl Target {
    /// Build a target from an observation with no verdict attached yet
    pub fn from_observation(obs: &Observation, bssid: String) -> Self {
        Self {
            ssid: obs.ssid.clone(),
            bssid,
            signal: obs.signal,
            band: obs.band,
            encryption: obs.encryption.clone(),
            observer: obs.observer,
            vendor: UNKNOWN_VENDOR.to_string(),
            distance_m: 0.0,
            is_threat: false,
            threat_label: String::new(),
            confidence: Confidence::None,
            is_mobile: false,
            is_pacing: false,
        }
    }

    pub fn apply_verdict(&mut self, verdict: &Verdict) {
        self.is_threat = verdict.is_threat;
        self.threat_label = verdict.label.clone();
        self.confidence = verdict.confidence;
    }

    pub fn verdict(&self) -> Verdict {
        Verdict {
            is_threat: self.is_threat,
            label: self.threat_label.clone(),
            confidence: self.confidence,
        }
    }

    pub fn display_ssid(&self) -> &str {
        if self.ssid.is_empty() {
            crate::logic::observation::HIDDEN_SSID
        } else {
            &self.ssid
        }
    }
}
