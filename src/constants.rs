//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Runtime overrides come from environment variables, then from the JSON
//! config file (see `logic::config`).

use std::path::PathBuf;

/// Default scan cycle interval (milliseconds)
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 2_000;

/// Default consumer refresh interval (milliseconds, ~20 Hz)
pub const DEFAULT_CONSUMER_INTERVAL_MS: u64 = 50;

/// Upper bound for any external I/O the core waits on (persistence, alert delivery)
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 2_000;

/// How long shutdown waits for the producer to drain
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 3_000;

/// Intercept database file name
pub const DB_FILE_NAME: &str = "intercepts.db";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Whitelist file name, re-read while running
pub const WHITELIST_FILE_NAME: &str = "whitelist.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "CivOps Recon";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Base data directory for the app
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("civops")
}

/// Get scan interval from environment or use default
pub fn get_scan_interval_ms() -> u64 {
    std::env::var("CIVOPS_SCAN_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_SCAN_INTERVAL_MS)
}

/// Get intercept database path from environment or use default
pub fn get_db_path() -> PathBuf {
    std::env::var("CIVOPS_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_data_dir().join(DB_FILE_NAME))
}

/// Get config file path from environment or use default
pub fn get_config_path() -> PathBuf {
    std::env::var("CIVOPS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_data_dir().join(CONFIG_FILE_NAME))
}

/// Get whitelist file path from environment or use default
pub fn get_whitelist_path() -> PathBuf {
    std::env::var("CIVOPS_WHITELIST")
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_data_dir().join(WHITELIST_FILE_NAME))
}

/// Check if demo mode is forced from the environment
pub fn is_demo_mode_forced() -> bool {
    std::env::var("CIVOPS_DEMO_MODE")
        .map(|s| s.to_lowercase() == "true" || s == "1")
        .unwrap_or(false)
}
