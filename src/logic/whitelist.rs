//! Whitelist Filter
//!
//! Known-friendly identities are dropped before classification.
//! Matching is exact and case-sensitive, as configured.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logic::config::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Whitelist {
    /// Ignored network names
    pub ssids: HashSet<String>,
    /// Ignored BSSIDs
    pub macs: HashSet<String>,
}

impl Whitelist {
    pub fn new<S, M>(ssids: S, macs: M) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            ssids: ssids.into_iter().map(Into::into).collect(),
            macs: macs.into_iter().map(Into::into).collect(),
        }
    }

    /// Load `{ "ssids": [...], "macs": [...] }`; missing file = empty list
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Union of both lists
    pub fn merged(&self, other: &Whitelist) -> Whitelist {
        Whitelist {
            ssids: self.ssids.union(&other.ssids).cloned().collect(),
            macs: self.macs.union(&other.macs).cloned().collect(),
        }
    }

    /// True if the observation must never reach the pipeline
    pub fn is_suppressed(&self, ssid: &str, bssid: &str) -> bool {
        self.ssids.contains(ssid) || self.macs.contains(bssid)
    }
}

// ============================================================================
// FILE REFRESH
// ============================================================================

/// Whitelist file re-read between cycles, on top of a fixed base list
pub struct WhitelistFile {
    path: PathBuf,
    base: Whitelist,
    last: Option<Whitelist>,
}

impl WhitelistFile {
    pub fn new(path: PathBuf, base: Whitelist) -> Self {
        Self {
            path,
            base,
            last: None,
        }
    }

    /// Re-read the file. Returns the effective list when it differs from the
    /// last one returned; the first call always returns it.
    pub fn refresh(&mut self) -> Result<Option<Whitelist>, ConfigError> {
        let effective = self.base.merged(&Whitelist::load(&self.path)?);
        if self.last.as_ref() == Some(&effective) {
            return Ok(None);
        }

        log::info!(
            "Whitelist from {:?}: {} SSIDs, {} MACs",
            self.path,
            effective.ssids.len(),
            effective.macs.len()
        );
        self.last = Some(effective.clone());
        Ok(Some(effective))
    }
}
