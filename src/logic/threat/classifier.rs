//! Threat Classifier
//!
//! CHỈ chứa logic classify - không có types, không có signatures.
//! Input: SSID + BSSID
//! Output: Verdict

use super::signatures::{
    lookup_oui, AIRLINK_LABEL, AIRLINK_TOKEN, CRADLEPOINT_LABEL, CRADLEPOINT_TOKEN,
    SUSPICIOUS_SSIDS, VENDOR_SSID_RULES,
};
use super::types::{Confidence, Verdict, UNKNOWN_VENDOR};
use crate::logic::observation::{normalize_bssid, oui_prefix};

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Classify an access point identity.
///
/// Priority, first match wins:
/// 1. OUI prefix (hardware evidence) -> HIGH
/// 2. Named vendor SSID substrings -> HIGH
/// 3. Hardware SSID patterns -> MED
/// 4. Generic keywords -> LOW
pub fn classify(ssid: &str, bssid: &str) -> Verdict {
    if let Some(verdict) = classify_mac(bssid) {
        return verdict;
    }

    if ssid.is_empty() {
        return Verdict::clear();
    }

    let s_lower = ssid.to_lowercase();

    classify_vendor_ssid(&s_lower)
        .or_else(|| classify_hardware_pattern(&s_lower))
        .or_else(|| classify_keyword(&s_lower))
        .unwrap_or_else(Verdict::clear)
}

/// Vendor name for a BSSID, `UNKNOWN` when the OUI is not listed
pub fn resolve_vendor(bssid: &str) -> String {
    normalize_bssid(bssid)
        .as_deref()
        .and_then(oui_prefix)
        .and_then(lookup_oui)
        .map(|entry| entry.vendor.to_string())
        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
}

// ============================================================================
// RULE TIERS
// ============================================================================

fn classify_mac(bssid: &str) -> Option<Verdict> {
    let normalized = normalize_bssid(bssid)?;
    let entry = lookup_oui(oui_prefix(&normalized)?)?;

    Some(Verdict::threat(
        format!("[{}: {}]", entry.vendor, entry.device_type),
        Confidence::High,
    ))
}

fn classify_vendor_ssid(s_lower: &str) -> Option<Verdict> {
    VENDOR_SSID_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| s_lower.contains(n)))
        .map(|(_, label)| Verdict::threat(*label, Confidence::High))
}

fn classify_hardware_pattern(s_lower: &str) -> Option<Verdict> {
    if s_lower.contains(CRADLEPOINT_TOKEN) && s_lower.contains('-') {
        return Some(Verdict::threat(CRADLEPOINT_LABEL, Confidence::Med));
    }
    if s_lower.contains(AIRLINK_TOKEN) {
        return Some(Verdict::threat(AIRLINK_LABEL, Confidence::Med));
    }
    None
}

fn classify_keyword(s_lower: &str) -> Option<Verdict> {
    SUSPICIOUS_SSIDS
        .iter()
        .find(|kw| s_lower.contains(*kw))
        .map(|kw| Verdict::threat(format!("[{}]", kw.to_uppercase()), Confidence::Low))
}

// ============================================================================
// TESTS
// ============================================================================
