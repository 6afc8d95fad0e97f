//! Logic Module - Business Logic & Engines
//!
//! ## Layout
//! - `observation` - Normalized scan input (Observation, Band, ObserverFix)
//! - `threat/` - Signature table + deterministic classifier
//! - `distance` - Signal-to-range estimate
//! - `history` - Bounded per-BSSID sample windows
//! - `mobility/` - Mobility & pacing analysis
//! - `whitelist` - Known-friendly suppression
//! - `alert/` - Debounced announcements + delivery sinks
//! - `persistence/` - Append-only intercept store
//! - `acquisition` - Observation/telemetry collaborator traits
//! - `process` - Child processes bounded by a deadline
//! - `pipeline/` - Per-cycle orchestration, snapshot, producer engine
//! - `status` - Headless consumer loop

pub mod config;
pub mod observation;
pub mod threat;
pub mod distance;
pub mod history;
pub mod mobility;
pub mod whitelist;
pub mod alert;
pub mod persistence;
pub mod acquisition;
pub mod process;
pub mod pipeline;
pub mod status;
