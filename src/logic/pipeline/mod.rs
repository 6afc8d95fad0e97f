//! Pipeline Module
//!
//! Observation -> Target, once per scan cycle, plus the producer that drives it.
//!
//! ## Structure
//! - `cycle`: the per-cycle stage chain (filter, classify, distance, history, mobility, alerts)
//! - `snapshot`: atomically published target list for readers
//! - `engine`: producer task lifecycle (start, tick, bounded stop)

pub mod cycle;
pub mod snapshot;
pub mod engine;


pub use cycle::{CycleOutput, ObservationPipeline};
pub use snapshot::{Snapshot, SnapshotHandle};
pub use engine::{Collaborators, Engine, EngineError, EngineState};
