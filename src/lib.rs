//! CivOps Recon Core
//!
//! Classifies, tracks and alerts on wireless access point observations.
//! Acquisition, rendering and map export are external collaborators; this
//! crate owns the per-cycle pipeline and the producer/consumer plumbing.

pub mod constants;
pub mod logic;
