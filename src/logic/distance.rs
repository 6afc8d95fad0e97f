//! Distance Estimator
//!
//! Log-distance path loss: `d = 10 ^ ((ref - dBm) / (10 * n))`.
//! This is a coarse range hint for the operator, not a calibrated
//! measurement. Antenna gain, transmit power and obstacles all vary per
//! device and are not modeled.

use crate::logic::observation::{percent_to_dbm, Band};

// ============================================================================
// PATH LOSS PARAMETERS
// ============================================================================

/// Reference power at 1 m, 2.4 GHz (dBm)
pub const REF_POWER_2G4_DBM: f64 = -38.0;
/// Path loss exponent, 2.4 GHz
pub const PATH_LOSS_EXP_2G4: f64 = 2.5;

/// Reference power at 1 m, 5 GHz (dBm)
pub const REF_POWER_5G_DBM: f64 = -42.0;
/// Path loss exponent, 5 GHz (attenuates faster through obstacles)
pub const PATH_LOSS_EXP_5G: f64 = 3.0;

/// (reference power, exponent) for a band
fn path_loss_params(band: Band) -> (f64, f64) {
    match band {
        Band::Ghz5 | Band::Ghz6 => (REF_POWER_5G_DBM, PATH_LOSS_EXP_5G),
        Band::Ghz2_4 | Band::Unknown => (REF_POWER_2G4_DBM, PATH_LOSS_EXP_2G4),
    }
}

/// Estimated range in meters, rounded to 2 decimals. Invalid input -> 0.0
pub fn estimate_distance(signal: u8, band: Band) -> f64 {
    if signal > 100 {
        return 0.0;
    }

    let (ref_power, exponent) = path_loss_params(band);
    let dbm = percent_to_dbm(signal);
    let meters = 10f64.powf((ref_power - dbm) / (10.0 * exponent));

    if !meters.is_finite() || meters < 0.0 {
        return 0.0;
    }
    (meters * 100.0).round() / 100.0
}

// ============================================================================
// PROXIMITY HINT (seeker mode)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Proximity {
    Far,
    Near,
    VeryClose5G,
    Immediate,
}

impl Proximity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proximity::Far => "FAR",
            Proximity::Near => "NEAR",
            Proximity::VeryClose5G => "VERY CLOSE (5GHz)",
            Proximity::Immediate => "IMMEDIATE PROXIMITY",
        }
    }
}

/// Operator-facing proximity bucket. A strong 5 GHz signal always reads
/// `VERY CLOSE (5GHz)`, even above the immediate threshold.
pub fn proximity_hint(signal: u8, band: Band) -> Proximity {
    if signal > 60 && band == Band::Ghz5 {
        Proximity::VeryClose5G
    } else if signal > 80 {
        Proximity::Immediate
    } else if signal > 60 {
        Proximity::Near
    } else {
        Proximity::Far
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        // 70% -> -65 dBm; 2.4G: 10^(27/25)
        assert_eq!(estimate_distance(70, Band::Ghz2_4), 12.02);
        // 5G: 10^(23/30)
        assert_eq!(estimate_distance(70, Band::Ghz5), 5.84);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        for band in [Band::Ghz2_4, Band::Ghz5, Band::Ghz6, Band::Unknown] {
            let mut last = f64::MAX;
            for signal in 0..=100u8 {
                let d = estimate_distance(signal, band);
                assert!(d >= 0.0);
                assert!(d <= last, "band {band} signal {signal}: {d} > {last}");
                last = d;
            }
        }
    }

    #[test]
    fn test_invalid_signal() {
        assert_eq!(estimate_distance(101, Band::Ghz2_4), 0.0);
        assert_eq!(estimate_distance(255, Band::Ghz5), 0.0);
    }

    #[test]
    fn test_5g_attenuates_faster() {
        assert!(estimate_distance(40, Band::Ghz5) < estimate_distance(40, Band::Ghz2_4));
    }

    #[test]
    fn test_proximity_hint() {
        assert_eq!(proximity_hint(90, Band::Ghz5), Proximity::VeryClose5G);
        assert_eq!(proximity_hint(90, Band::Ghz2_4), Proximity::Immediate);
        assert_eq!(proximity_hint(90, Band::Ghz6), Proximity::Immediate);
        assert_eq!(proximity_hint(70, Band::Ghz5), Proximity::VeryClose5G);
        assert_eq!(proximity_hint(70, Band::Ghz2_4), Proximity::Near);
        assert_eq!(proximity_hint(40, Band::Ghz2_4).as_str(), "FAR");
    }
}
