//! Engine Configuration
//!
//! JSON config file with serde defaults; every field is optional.
//! Environment variables from `constants` take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::logic::mobility::MobilityThresholds;
use crate::logic::observation::ObserverFix;
use crate::logic::whitelist::Whitelist;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Producer cycle interval
    pub scan_interval_ms: u64,
    /// Headless status loop refresh
    pub consumer_interval_ms: u64,
    /// Timeout for persistence writes / alert delivery
    pub io_timeout_ms: u64,
    /// Bounded drain on shutdown
    pub shutdown_timeout_ms: u64,
    /// Intercept database; defaults to the app data dir
    pub db_path: Option<PathBuf>,
    /// Use own position/speed; when off, observer fields come only from observations
    pub gps_enabled: bool,
    /// Known position for stationary deployments
    pub fixed_position: Option<ObserverFix>,
    /// Use the demo source even when a scanner command is set
    pub demo_mode: bool,
    /// External scanner: program followed by its arguments, prints a JSON array
    pub scan_command: Vec<String>,
    pub tts_enabled: bool,
    pub whitelist: Whitelist,
    pub thresholds: MobilityThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: constants::DEFAULT_SCAN_INTERVAL_MS,
            consumer_interval_ms: constants::DEFAULT_CONSUMER_INTERVAL_MS,
            io_timeout_ms: constants::DEFAULT_IO_TIMEOUT_MS,
            shutdown_timeout_ms: constants::DEFAULT_SHUTDOWN_TIMEOUT_MS,
            db_path: None,
            gps_enabled: true,
            fixed_position: None,
            demo_mode: false,
            scan_command: Vec::new(),
            tts_enabled: false,
            whitelist: Whitelist::default(),
            thresholds: MobilityThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load from file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&data)?;
        config.validate()?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// File config, then environment overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if std::env::var("CIVOPS_SCAN_INTERVAL_MS").is_ok() {
            self.scan_interval_ms = constants::get_scan_interval_ms();
        }
        if std::env::var("CIVOPS_DB_PATH").is_ok() {
            self.db_path = Some(constants::get_db_path());
        }
        if constants::is_demo_mode_forced() {
            self.demo_mode = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval_ms == 0 {
            return Err(ConfigError::Invalid("scan_interval_ms must be > 0".to_string()));
        }
        if self.consumer_interval_ms == 0 {
            return Err(ConfigError::Invalid("consumer_interval_ms must be > 0".to_string()));
        }
        if self.thresholds.observer_stationary_max > self.thresholds.observer_moving_min {
            return Err(ConfigError::Invalid(
                "observer_stationary_max must not exceed observer_moving_min".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn consumer_interval(&self) -> Duration {
        Duration::from_millis(self.consumer_interval_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(constants::get_db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.scan_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "scan_interval_ms": 1000,
                "demo_mode": true,
                "scan_command": ["termux-wifi-scaninfo"],
                "fixed_position": { "latitude": 45.5, "longitude": -122.6 },
                "whitelist": { "ssids": ["HomeNet"] },
                "thresholds": { "pacing_speed_min_mps": 6.0 }
            }"#,
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.scan_interval_ms, 1000);
        assert!(config.demo_mode);
        assert_eq!(config.scan_command, vec!["termux-wifi-scaninfo".to_string()]);
        assert_eq!(config.fixed_position, Some(ObserverFix::located(45.5, -122.6)));
        assert!(config.whitelist.is_suppressed("HomeNet", "00:00:00:00:00:01"));
        assert_eq!(config.thresholds.pacing_speed_min_mps, 6.0);
        assert_eq!(config.thresholds.min_samples, 5);
        assert_eq!(config.io_timeout_ms, constants::DEFAULT_IO_TIMEOUT_MS);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse(_))));

        fs::write(&path, r#"{ "scan_interval_ms": 0 }"#).unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Invalid(_))));
    }
}
