//! Threat Module
//!
//! Phân loại access point dựa trên MAC OUI và SSID heuristics.
//! Deterministic, no I/O.
//!
//! ## Structure
//! - `types`: Confidence, Verdict, Target
//! - `signatures`: OUI table + keyword tiers
//! - `classifier`: Classification logic
//!
//! ## Usage
//! ```ignore
//! use civops_core::logic::threat::{classify, Confidence};
//!
//! let verdict = classify("PoliceMDT1", "AA:BB:CC:DD:EE:FF");
//! assert_eq!(verdict.confidence, Confidence::Low);
//! ```

pub mod types;
pub mod signatures;
pub mod classifier;

pub use types::{Confidence, Target, Verdict, UNKNOWN_VENDOR};
pub use signatures::{lookup_oui, OuiEntry};
pub use classifier::{classify, resolve_vendor};
