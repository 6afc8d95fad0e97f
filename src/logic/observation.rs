//! Observation Types
//!
//! Normalized scan input handed over by the acquisition collaborator.
//! KHÔNG chứa classification logic - chỉ data + normalization helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical BSSID form: `AA:BB:CC:DD:EE:FF`
static BSSID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-F]{2}:){5}[0-9A-F]{2}$").expect("valid BSSID regex"));

/// Display name for networks that do not broadcast an SSID
pub const HIDDEN_SSID: &str = "HIDDEN";

// ============================================================================
// BAND
// ============================================================================

/// Frequency band tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4G")]
    Ghz2_4,
    #[serde(rename = "5G")]
    Ghz5,
    #[serde(rename = "6G")]
    Ghz6,
    #[serde(rename = "UNK")]
    Unknown,
}

impl Band {
    /// Derive band from a channel center frequency
    pub fn from_frequency_mhz(freq: u32) -> Self {
        match freq {
            0 => Band::Unknown,
            f if f > 6000 => Band::Ghz6,
            f if f > 5000 => Band::Ghz5,
            _ => Band::Ghz2_4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Ghz2_4 => "2.4G",
            Band::Ghz5 => "5G",
            Band::Ghz6 => "6G",
            Band::Unknown => "UNK",
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "2.4G" | "2.4" | "2.4GHZ" => Band::Ghz2_4,
            "5G" | "5" | "5GHZ" => Band::Ghz5,
            "6G" | "6" | "6GHZ" => Band::Ghz6,
            _ => Band::Unknown,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// OBSERVER FIX (own GPS / speed)
// ============================================================================

/// Observer telemetry for one cycle. Every field is nullable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObserverFix {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Ground speed in m/s
    pub speed_mps: Option<f64>,
}

impl ObserverFix {
    pub fn located(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            speed_mps: None,
        }
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    /// Field-wise fallback: keep own values, fill gaps from `other`.
    /// Position is taken as a pair so lat/lon never come from different fixes.
    pub fn or(self, other: ObserverFix) -> Self {
        let (latitude, longitude) = if self.latitude.is_some() && self.longitude.is_some() {
            (self.latitude, self.longitude)
        } else {
            (other.latitude, other.longitude)
        };
        Self {
            latitude,
            longitude,
            speed_mps: self.speed_mps.or(other.speed_mps),
        }
    }
}

// ============================================================================
// OBSERVATION
// ============================================================================

/// One access point sighting, immutable for the cycle it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Network name, may be empty for hidden networks
    pub ssid: String,
    /// Access point MAC as reported by the scanner
    pub bssid: String,
    /// Normalized signal strength 0-100
    pub signal: u8,
    pub band: Band,
    pub encryption: String,
    /// Observer position/speed at scan time
    #[serde(default)]
    pub observer: ObserverFix,
}

impl Observation {
    pub fn new(ssid: &str, bssid: &str, signal: u8, band: Band) -> Self {
        Self {
            ssid: ssid.to_string(),
            bssid: bssid.to_string(),
            signal,
            band,
            encryption: "UNK".to_string(),
            observer: ObserverFix::default(),
        }
    }

    pub fn with_encryption(mut self, encryption: &str) -> Self {
        self.encryption = encryption.to_string();
        self
    }

    pub fn with_observer(mut self, observer: ObserverFix) -> Self {
        self.observer = observer;
        self
    }

    /// SSID as shown to the operator
    pub fn display_ssid(&self) -> &str {
        if self.ssid.is_empty() {
            HIDDEN_SSID
        } else {
            &self.ssid
        }
    }
}

// ============================================================================
// NORMALIZATION HELPERS
// ============================================================================

/// Map raw RSSI (dBm) onto the 0-100 scale used everywhere in the core
pub fn normalize_rssi(dbm: i32) -> u8 {
    (2 * (dbm + 100)).clamp(0, 100) as u8
}

/// Inverse of `normalize_rssi`
pub fn percent_to_dbm(signal: u8) -> f64 {
    signal as f64 / 2.0 - 100.0
}

/// Normalize a MAC to uppercase colon-separated form.
///
/// Accepts `aa:bb:..`, `aa-bb-..` and bare 12-digit hex. Returns `None` for
/// anything that is not a 6-octet address.
pub fn normalize_bssid(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase().replace('-', ":");

    let candidate = if upper.len() == 12 && upper.chars().all(|c| c.is_ascii_hexdigit()) {
        upper
            .as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect::<Vec<_>>()
            .join(":")
    } else {
        upper
    };

    if BSSID_RE.is_match(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// OUI (first 3 octets) of a normalized BSSID
pub fn oui_prefix(normalized: &str) -> Option<&str> {
    normalized.get(..8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bssid_forms() {
        assert_eq!(normalize_bssid("00:25:df:11:22:33").as_deref(), Some("00:25:DF:11:22:33"));
        assert_eq!(normalize_bssid("00-25-DF-11-22-33").as_deref(), Some("00:25:DF:11:22:33"));
        assert_eq!(normalize_bssid("0025df112233").as_deref(), Some("00:25:DF:11:22:33"));
        assert_eq!(normalize_bssid(""), None);
        assert_eq!(normalize_bssid("not-a-mac"), None);
        assert_eq!(normalize_bssid("00:25:DF:11:22"), None);
    }

    #[test]
    fn test_normalize_rssi_clamps() {
        assert_eq!(normalize_rssi(-100), 0);
        assert_eq!(normalize_rssi(-120), 0);
        assert_eq!(normalize_rssi(-65), 70);
        assert_eq!(normalize_rssi(-50), 100);
        assert_eq!(normalize_rssi(-20), 100);
        assert_eq!(percent_to_dbm(70), -65.0);
    }

    #[test]
    fn test_band_from_frequency() {
        assert_eq!(Band::from_frequency_mhz(2437), Band::Ghz2_4);
        assert_eq!(Band::from_frequency_mhz(5180), Band::Ghz5);
        assert_eq!(Band::from_frequency_mhz(6115), Band::Ghz6);
        assert_eq!(Band::from_frequency_mhz(0), Band::Unknown);
        assert_eq!(Band::parse("5G"), Band::Ghz5);
    }

    #[test]
    fn test_observer_fix_fallback() {
        let own = ObserverFix { latitude: Some(1.0), longitude: None, speed_mps: Some(2.0) };
        let telemetry = ObserverFix::located(10.0, 20.0).with_speed(9.0);

        let merged = own.or(telemetry);
        assert_eq!(merged.latitude, Some(10.0));
        assert_eq!(merged.longitude, Some(20.0));
        assert_eq!(merged.speed_mps, Some(2.0));

        assert_eq!(ObserverFix::default().or(ObserverFix::default()), ObserverFix::default());
    }

    #[test]
    fn test_hidden_display_name() {
        let obs = Observation::new("", "00:11:22:33:44:55", 50, Band::Ghz2_4);
        assert_eq!(obs.display_ssid(), HIDDEN_SSID);
        assert!(obs.ssid.is_empty());
    }
}
