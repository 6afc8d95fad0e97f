use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::observation::Band;
use crate::logic::threat::{Confidence, Target};

/// One persisted row: a Target as seen in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptRecord {
    pub recorded_at: DateTime<Utc>,
    pub ssid: String,
    pub bssid: String,
    pub vendor: String,
    pub signal: u8,
    pub band: Band,
    pub encryption: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_mps: Option<f64>,
    pub distance_m: f64,
    pub is_threat: bool,
    pub threat_label: String,
    pub confidence: Confidence,
    pub is_mobile: bool,
    pub is_pacing: bool,
}

impl InterceptRecord {
    pub fn from_target(target: &Target, recorded_at: DateTime<Utc>) -> Self {
        Self {
            recorded_at,
            ssid: target.ssid.clone(),
            bssid: target.bssid.clone(),
            vendor: target.vendor.clone(),
            signal: target.signal,
            band: target.band,
            encryption: target.encryption.clone(),
            latitude: target.observer.latitude,
            longitude: target.observer.longitude,
            speed_mps: target.observer.speed_mps,
            distance_m: target.distance_m,
            is_threat: target.is_threat,
            threat_label: target.threat_label.clone(),
            confidence: target.confidence,
            is_mobile: target.is_mobile,
            is_pacing: target.is_pacing,
        }
    }
}
