//! Producer Engine
//!
//! Runs one pipeline cycle per scan interval on a single task and publishes
//! the result. Acquisition, persistence and alert delivery are all bounded
//! by `io_timeout`; persistence and alerts run detached so a slow disk or
//! speech backend cannot delay the next cycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::cycle::ObservationPipeline;
use super::snapshot::{Snapshot, SnapshotHandle};
use crate::logic::acquisition::{ObservationSource, TelemetrySource};
use crate::logic::alert::{deliver_detached, AlertSink};
use crate::logic::config::EngineConfig;
use crate::logic::observation::{Observation, ObserverFix};
use crate::logic::persistence::{persist_cycle, InterceptStore};
use crate::logic::threat::Target;
use crate::logic::whitelist::Whitelist;

/// Persistence writes allowed in flight before a cycle's write is dropped
const MAX_PENDING_WRITES: usize = 4;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine is already running")]
    AlreadyRunning,
    #[error("Engine is not running")]
    NotRunning,
    #[error("Producer did not stop within {0:?}")]
    JoinTimeout(Duration),
    #[error("Producer task failed: {0}")]
    Producer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
    Stopping,
}

/// External collaborators the producer drives
pub struct Collaborators {
    pub source: Box<dyn ObservationSource>,
    pub telemetry: Box<dyn TelemetrySource>,
    pub sink: Arc<dyn AlertSink>,
    pub store: Option<Arc<InterceptStore>>,
}

pub struct Engine {
    config: EngineConfig,
    snapshot: SnapshotHandle,
    state: Arc<RwLock<EngineState>>,
    shutdown_tx: Option<broadcast::Sender<()>>,
    whitelist_tx: Option<watch::Sender<Option<Whitelist>>>,
    producer: Option<JoinHandle<ObservationPipeline>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            snapshot: SnapshotHandle::new(),
            state: Arc::new(RwLock::new(EngineState::Stopped)),
            shutdown_tx: None,
            whitelist_tx: None,
            producer: None,
        }
    }

    /// Read side for consumers
    pub fn snapshot(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    /// Shutdown signal for consumer loops; `None` when not running
    pub fn subscribe_shutdown(&self) -> Option<broadcast::Receiver<()>> {
        self.shutdown_tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Replace the whitelist; the producer applies it before its next cycle
    pub fn update_whitelist(&self, whitelist: Whitelist) -> Result<(), EngineError> {
        let tx = self.whitelist_tx.as_ref().ok_or(EngineError::NotRunning)?;
        tx.send(Some(whitelist)).map_err(|_| EngineError::NotRunning)
    }

    /// Start the producer. The pipeline moves into the producer task, so a
    /// second concurrent cycle cannot exist.
    pub fn start(
        &mut self,
        pipeline: ObservationPipeline,
        collaborators: Collaborators,
    ) -> Result<(), EngineError> {
        {
            let mut state = self.state.write();
            if *state != EngineState::Stopped {
                log::error!("Engine start requested while {:?}", *state);
                return Err(EngineError::AlreadyRunning);
            }
            *state = EngineState::Running;
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        self.shutdown_tx = Some(shutdown_tx);
        let (whitelist_tx, whitelist_rx) = watch::channel(None);
        self.whitelist_tx = Some(whitelist_tx);

        let producer = Producer {
            pipeline,
            source: Arc::new(Mutex::new(collaborators.source)),
            telemetry: collaborators.telemetry,
            sink: collaborators.sink,
            store: collaborators.store,
            snapshot: self.snapshot.clone(),
            config: self.config.clone(),
            whitelist_rx,
            pending_writes: Arc::new(AtomicUsize::new(0)),
            cycle: 0,
        };

        self.producer = Some(tokio::spawn(producer.run(shutdown_rx)));
        log::info!(
            "Producer started (interval {:?}, io timeout {:?})",
            self.config.scan_interval(),
            self.config.io_timeout()
        );
        Ok(())
    }

    /// Cooperative stop with a bounded join. Returns the pipeline so its
    /// state can be inspected after shutdown.
    pub async fn stop(&mut self) -> Result<Option<ObservationPipeline>, EngineError> {
        let Some(handle) = self.producer.take() else {
            return Ok(None);
        };

        *self.state.write() = EngineState::Stopping;
        self.whitelist_tx = None;
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let timeout = self.config.shutdown_timeout();
        let abort = handle.abort_handle();
        let result = tokio::time::timeout(timeout, handle).await;
        *self.state.write() = EngineState::Stopped;

        match result {
            Ok(Ok(pipeline)) => {
                log::info!("Producer stopped");
                Ok(Some(pipeline))
            }
            Ok(Err(e)) => Err(EngineError::Producer(e.to_string())),
            Err(_) => {
                abort.abort();
                log::error!("Producer did not stop within {:?}, aborted", timeout);
                Err(EngineError::JoinTimeout(timeout))
            }
        }
    }
}

// ============================================================================
// PRODUCER TASK
// ============================================================================

struct Producer {
    pipeline: ObservationPipeline,
    source: Arc<Mutex<Box<dyn ObservationSource>>>,
    telemetry: Box<dyn TelemetrySource>,
    sink: Arc<dyn AlertSink>,
    store: Option<Arc<InterceptStore>>,
    snapshot: SnapshotHandle,
    config: EngineConfig,
    whitelist_rx: watch::Receiver<Option<Whitelist>>,
    pending_writes: Arc<AtomicUsize>,
    cycle: u64,
}

impl Producer {
    async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) -> ObservationPipeline {
        let mut ticker = tokio::time::interval(self.config.scan_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {}
            }
            self.tick().await;
        }

        self.pipeline
    }

    async fn tick(&mut self) {
        let fix = if self.config.gps_enabled {
            self.telemetry.current_fix()
        } else {
            ObserverFix::default()
        };

        // Acquisition fault or empty batch: keep the previous snapshot
        let Some(batch) = acquire(self.source.clone(), self.config.io_timeout()).await else {
            return;
        };

        self.apply_whitelist_update();

        let now = Utc::now();
        let Some(output) = self.pipeline.run_cycle(&batch, fix, now) else {
            log::debug!("Empty scan batch, keeping previous snapshot");
            return;
        };

        self.cycle += 1;
        let targets = Arc::new(output.targets);
        self.snapshot.publish(Snapshot::new(self.cycle, now, targets.clone()));

        for phrase in output.alerts {
            deliver_detached(self.sink.clone(), phrase, self.config.io_timeout());
        }

        if let Some(store) = &self.store {
            self.persist_detached(store.clone(), now, targets);
        }
    }

    fn apply_whitelist_update(&mut self) {
        if !self.whitelist_rx.has_changed().unwrap_or(false) {
            return;
        }
        let update = self.whitelist_rx.borrow_and_update().clone();
        if let Some(whitelist) = update {
            log::info!(
                "Whitelist updated: {} SSIDs, {} MACs",
                whitelist.ssids.len(),
                whitelist.macs.len()
            );
            self.pipeline.set_whitelist(whitelist);
        }
    }

    fn persist_detached(
        &self,
        store: Arc<InterceptStore>,
        now: DateTime<Utc>,
        targets: Arc<Vec<Target>>,
    ) {
        if targets.is_empty() {
            return;
        }
        if self.pending_writes.load(Ordering::SeqCst) >= MAX_PENDING_WRITES {
            log::error!(
                "Intercept store backlog full, dropping {} rows for cycle {}",
                targets.len(),
                self.cycle
            );
            return;
        }

        let pending = self.pending_writes.clone();
        let timeout = self.config.io_timeout();
        pending.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            match persist_cycle(store, now, targets, timeout).await {
                Ok(n) => log::debug!("Persisted {} intercepts", n),
                Err(e) => log::error!("Failed to persist intercepts: {}", e),
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        });
    }
}

/// Pull one batch off the runtime, bounded by `timeout`.
/// Any fault counts as "no update" for this cycle.
async fn acquire(
    source: Arc<Mutex<Box<dyn ObservationSource>>>,
    timeout: Duration,
) -> Option<Vec<Observation>> {
    let task = tokio::task::spawn_blocking(move || {
        let mut src = source.lock();
        src.scan().map_err(|e| (src.name(), e))
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(batch))) => Some(batch),
        Ok(Ok(Err((name, e)))) => {
            log::warn!("Scan via {} failed: {}", name, e);
            None
        }
        Ok(Err(e)) => {
            log::warn!("Scan task failed: {}", e);
            None
        }
        Err(_) => {
            log::warn!("Scan timed out after {:?}", timeout);
            None
        }
    }
}
