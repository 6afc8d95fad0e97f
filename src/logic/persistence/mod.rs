//! Persistence Module - Intercept log
//!
//! Writes every emitted Target (threat or not) with a timestamp.
//! Logging all observations, not only threats, keeps heat maps possible.

pub mod record;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::logic::threat::Target;

pub use record::InterceptRecord;
pub use store::InterceptStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Write task failed: {0}")]
    Task(String),
    #[error("Write timed out after {0:?}")]
    Timeout(Duration),
}

/// Append a cycle off the async runtime, bounded by `timeout`
pub async fn persist_cycle(
    store: Arc<InterceptStore>,
    recorded_at: DateTime<Utc>,
    targets: Arc<Vec<Target>>,
    timeout: Duration,
) -> Result<usize, StoreError> {
    let task = tokio::task::spawn_blocking(move || store.append(recorded_at, &targets));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(StoreError::Task(e.to_string())),
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::observation::{Band, Observation};

    #[tokio::test]
    async fn test_persist_cycle_writes_all_targets() {
        let store = Arc::new(InterceptStore::open_in_memory().unwrap());
        let targets: Vec<Target> = ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, ssid)| {
                let obs = Observation::new(ssid, &format!("AA:BB:CC:00:00:0{}", i), 40, Band::Ghz2_4);
                Target::from_observation(&obs, obs.bssid.clone())
            })
            .collect();

        let written = persist_cycle(store.clone(), Utc::now(), Arc::new(targets), Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(written, 3);
        assert_eq!(store.count().unwrap(), 3);
    }
}
