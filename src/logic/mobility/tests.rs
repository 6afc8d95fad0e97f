use super::analyzer::{analyze, window_stats};
use super::rules::{MobilityThresholds, PACING_LABEL};
use crate::logic::history::Sample;
use crate::logic::threat::{Confidence, Verdict};

const BASE_LAT: f64 = 45.5231;
const BASE_LON: f64 = -122.6765;

/// Samples every `step_ms`, observer fixed at BASE_LAT
fn stationary_window(signals: &[u8], step_ms: i64) -> Vec<Sample> {
    signals
        .iter()
        .enumerate()
        .map(|(i, s)| Sample {
            timestamp_ms: i as i64 * step_ms,
            signal: *s,
            latitude: Some(BASE_LAT),
            longitude: Some(BASE_LON),
        })
        .collect()
}

/// Observer driving north ~20 m per sample
fn driving_window(signals: &[u8], step_ms: i64) -> Vec<Sample> {
    signals
        .iter()
        .enumerate()
        .map(|(i, s)| Sample {
            timestamp_ms: i as i64 * step_ms,
            signal: *s,
            latitude: Some(BASE_LAT + i as f64 * 0.0002),
            longitude: Some(BASE_LON),
        })
        .collect()
}

#[test]
fn test_cold_start_no_verdict() {
    let thresholds = MobilityThresholds::default();
    let window = stationary_window(&[20, 70, 15, 65], 2_000);
    let verdict = Verdict::threat("[POLICE]", Confidence::Low);

    let result = analyze(&verdict, &window, Some(20.0), &thresholds);
    assert!(!result.is_mobile);
    assert!(!result.is_pacing);
    assert_eq!(result.verdict, verdict);
}

#[test]
fn test_signal_swing_while_stationary_is_mobile() {
    let thresholds = MobilityThresholds::default();
    let window = stationary_window(&[20, 70, 15, 65, 25], 2_000);

    let result = analyze(&Verdict::clear(), &window, None, &thresholds);
    assert!(result.is_mobile);
    assert!(!result.is_pacing);
    assert_eq!(result.verdict, Verdict::clear());
}

#[test]
fn test_stable_signal_while_driving_is_mobile() {
    let thresholds = MobilityThresholds::default();
    let window = driving_window(&[50, 51, 50, 52, 51, 50], 2_000);

    let stats = window_stats(&window, &thresholds).unwrap();
    assert!(stats.lat_variance_scaled.unwrap() > thresholds.observer_moving_min);
    assert!(stats.signal_variance < thresholds.signal_variance_low);

    let result = analyze(&Verdict::clear(), &window, Some(3.0), &thresholds);
    assert!(result.is_mobile);
}

#[test]
fn test_stationary_stable_is_not_mobile() {
    let thresholds = MobilityThresholds::default();
    let window = stationary_window(&[50, 52, 49, 51, 50], 2_000);

    let result = analyze(&Verdict::clear(), &window, None, &thresholds);
    assert!(!result.is_mobile);
}

#[test]
fn test_unlocated_samples_excluded() {
    let thresholds = MobilityThresholds::default();
    let mut window = stationary_window(&[20, 70, 15, 65, 25], 2_000);
    for s in window.iter_mut() {
        s.latitude = None;
    }

    // no located samples: observer motion unknown, no mobility verdict
    let result = analyze(&Verdict::clear(), &window, None, &thresholds);
    assert!(!result.is_mobile);

    // two located samples are enough for a variance
    window[0].latitude = Some(BASE_LAT);
    window[4].latitude = Some(BASE_LAT);
    let result = analyze(&Verdict::clear(), &window, None, &thresholds);
    assert!(result.is_mobile);
}

#[test]
fn test_pacing_escalates_verdict() {
    let thresholds = MobilityThresholds::default();
    // 11 samples, 2s apart -> 20s window, mean 75
    let window = driving_window(&[75; 11], 2_000);
    let verdict = Verdict::threat("[CAR]", Confidence::Low);

    let result = analyze(&verdict, &window, Some(10.0), &thresholds);
    assert!(result.is_pacing);
    assert_eq!(result.verdict.label, PACING_LABEL);
    assert_eq!(result.verdict.confidence, Confidence::High);
    assert!(result.verdict.is_threat);
}

#[test]
fn test_pacing_overrides_non_threat() {
    let thresholds = MobilityThresholds::default();
    let window = driving_window(&[80; 11], 2_000);

    let result = analyze(&Verdict::clear(), &window, Some(12.0), &thresholds);
    assert!(result.is_pacing);
    assert!(result.verdict.is_threat);
}

#[test]
fn test_pacing_requires_speed() {
    let thresholds = MobilityThresholds::default();
    let window = driving_window(&[75; 11], 2_000);

    assert!(!analyze(&Verdict::clear(), &window, Some(3.0), &thresholds).is_pacing);
    assert!(!analyze(&Verdict::clear(), &window, Some(4.5), &thresholds).is_pacing);
    // missing speed defaults to 0
    assert!(!analyze(&Verdict::clear(), &window, None, &thresholds).is_pacing);
}

#[test]
fn test_pacing_requires_strong_signal() {
    let thresholds = MobilityThresholds::default();
    let window = driving_window(&[50; 11], 2_000);

    let result = analyze(&Verdict::clear(), &window, Some(10.0), &thresholds);
    assert!(!result.is_pacing);
    assert!(!result.verdict.is_threat);
}

#[test]
fn test_pacing_requires_duration() {
    let thresholds = MobilityThresholds::default();
    // 6 samples, 2s apart -> 10s window
    let window = driving_window(&[75; 6], 2_000);

    let result = analyze(&Verdict::clear(), &window, Some(10.0), &thresholds);
    assert!(!result.is_pacing);
}

#[test]
fn test_sensitivity_presets() {
    let high = MobilityThresholds::high_sensitivity();
    let low = MobilityThresholds::low_sensitivity();
    assert!(high.pacing_duration_min_secs < low.pacing_duration_min_secs);
    assert_eq!(high.min_samples, low.min_samples);
}
