//! Mobility Module
//!
//! Decides whether a target is moving and whether it is pacing the observer,
//! from the History Store window plus own GPS/speed.
//!
//! ## Structure
//! - `rules`: Thresholds (tunable heuristics)
//! - `analyzer`: Variance/pacing logic

pub mod rules;
pub mod analyzer;

#[cfg(test)]
mod tests;

pub use rules::{MobilityThresholds, MIN_HISTORY_SAMPLES, PACING_LABEL};
pub use analyzer::{analyze, window_stats, Assessment, WindowStats};
