//! Threat Signatures
//!
//! Static data only: OUI prefix map and SSID keyword tiers.
//! KHÔNG chứa logic classify - chỉ constants.

use std::collections::HashMap;
use once_cell::sync::Lazy;

// ============================================================================
// OUI PREFIXES (hardware MAC evidence)
// ============================================================================

/// `"XX:XX:XX"` -> (vendor, likely device type)
pub const SUSPICIOUS_OUIS: &[(&str, &str, &str)] = &[
    // Body cams & in-car video
    ("00:25:DF", "Axon (Taser)", "Bodycam/Fleet Hub"),
    ("00:1C:12", "Axon Enterprise", "Bodycam"),
    ("34:1C:F0", "WatchGuard Video", "In-Car Video System"),
    ("00:1E:06", "Wibrain", "Industrial Mobile PC"),
    ("00:0C:29", "VMware", "Mobile Server/MDC (Virtual Interface)"),
    ("00:50:C2", "TlON", "Surveillance System"),
    ("00:0F:92", "Vigilant Solutions", "ALPR Processor"),
    ("00:11:8C", "Genetec", "AutoVu ALPR"),
    // Fleet routers
    ("00:30:44", "Cradlepoint", "Police Fleet Router (IBR/AER Series)"),
    ("20:0C:C8", "Cradlepoint", "Police Fleet Router"),
    ("00:A0:F8", "Sierra Wireless", "AirLink Gateway (MP70/MG90)"),
    ("00:19:C8", "Sierra Wireless", "AirLink Gateway"),
    ("A8:4E:3F", "Peplink", "Vehicle Router (MAX BR1/Transit)"),
    ("00:1A:DD", "Peplink", "Vehicle Router"),
    ("00:0B:6B", "Wintec", "Industrial Wireless"),
    // Municipal / surveillance
    ("00:19:34", "Panasonic", "Arbitrator 360 / Toughbook"),
    ("00:C0:CA", "Panasonic", "Toughbook WLAN"),
    ("00:04:F2", "Polycom", "Wireless Headset (Dispatch)"),
    ("00:10:E7", "Breezecom", "Municipal Mesh Node"),
    ("00:20:A6", "Proxim", "Traffic/Surveillance Backhaul"),
    ("00:08:02", "Compaq", "Legacy MDC"),
    // Drones / UAV
    ("60:60:1F", "DJI", "Drone/UAV"),
    ("34:D2:62", "DJI", "Drone/UAV"),
    ("90:03:B7", "DJI", "Drone/UAV"),
    ("00:26:7E", "Parrot", "Drone/UAV"),
    ("90:3A:E6", "Autel", "Drone/UAV"),
];

/// OUI lookup, built once
pub static OUI_TABLE: Lazy<HashMap<&'static str, OuiEntry>> = Lazy::new(|| {
    SUSPICIOUS_OUIS
        .iter()
        .map(|(oui, vendor, device_type)| (*oui, OuiEntry { vendor, device_type }))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuiEntry {
    pub vendor: &'static str,
    pub device_type: &'static str,
}

/// Look up a normalized 3-octet prefix
pub fn lookup_oui(prefix: &str) -> Option<OuiEntry> {
    OUI_TABLE.get(prefix).copied()
}

// ============================================================================
// SSID RULES (operator-chosen text, tiered)
// ============================================================================

/// Named vendor substrings, checked in order (substrings, label)
pub const VENDOR_SSID_RULES: &[(&[&str], &str)] = &[
    (&["axon"], "[AXON BODYCAM]"),
    (&["watchguard"], "[WATCHGUARD]"),
    (&["lpr", "alpr"], "[ALPR SYSTEM]"),
];

/// Cradlepoint default SSIDs look like `IBR1100-3fa`
pub const CRADLEPOINT_TOKEN: &str = "ibr";
pub const CRADLEPOINT_LABEL: &str = "[CRADLEPOINT]";

pub const AIRLINK_TOKEN: &str = "airlink";
pub const AIRLINK_LABEL: &str = "[SIERRA WIRELESS]";

/// Generic suspicious keywords, first match wins
pub const SUSPICIOUS_SSIDS: &[&str] = &[
    // Standard police / gov
    "police", "sheriff", "patrol", "cop", "law", "enforcement",
    "mdc", "mdt", "mobile", "unit", "vehicle", "car", "squad",
    "publicsafety", "cityof", "county", "gov", "municipal",
    "emergency", "911", "dispatch", "command", "eoc",
    // Hardware / vendors
    "axon", "fleet", "bodycam", "taser", "evidence",
    "watchguard", "vigilant", "alpr", "lpr", "plate", "recognition",
    "cradlepoint", "ibr", "ibr600", "ibr900", "ibr1100", "ibr1700",
    "sierra", "airlink", "mp70", "gx450", "rv50", "mg90",
    "panasonic", "arbitrator", "toughbook",
    "kustom", "stalker", "radar", "lidar",
    "galls", "whelen", "soundoff",
    // Surveillance / covert
    "stingray", "hailstorm", "drt", "imsi", "covert", "surveillance", "hidden",
    "fbi", "dea", "atf", "dhs", "taskforce", "icac",
    "kel", "kel-tech", "dropcam", "polecam",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oui_table_complete() {
        assert_eq!(OUI_TABLE.len(), SUSPICIOUS_OUIS.len());
        for (oui, _, _) in SUSPICIOUS_OUIS {
            assert_eq!(oui.len(), 8);
            assert_eq!(*oui, oui.to_uppercase());
        }
    }

    #[test]
    fn test_keywords_are_lowercase() {
        assert!(SUSPICIOUS_SSIDS.iter().all(|kw| *kw == kw.to_lowercase()));
    }

    #[test]
    fn test_lookup() {
        let entry = lookup_oui("60:60:1F").unwrap();
        assert_eq!(entry.vendor, "DJI");
        assert!(lookup_oui("FF:FF:FF").is_none());
    }
}
