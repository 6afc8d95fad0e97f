//! CivOps Recon - headless entry point
//!
//! Wires config, intercept store, alert sink and the acquisition source into
//! the producer engine, then runs the status consumer until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use tokio::time::MissedTickBehavior;

use civops_core::constants;
use civops_core::logic::acquisition::{CommandSource, DemoSource, ObservationSource, StaticTelemetry};
use civops_core::logic::alert::{AlertSink, LogAlertSink, SpeechAlertSink};
use civops_core::logic::config::EngineConfig;
use civops_core::logic::persistence::InterceptStore;
use civops_core::logic::pipeline::{Collaborators, Engine, ObservationPipeline};
use civops_core::logic::status::run_status_loop;
use civops_core::logic::whitelist::WhitelistFile;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config_path = constants::get_config_path();
    let config = EngineConfig::load_with_env(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = rt.block_on(run(config.clone()));

    // Blocking work abandoned by a timeout must not hold the process open
    rt.shutdown_timeout(config.shutdown_timeout());
    result
}

fn select_source(config: &EngineConfig) -> Box<dyn ObservationSource> {
    if config.demo_mode {
        log::info!("Demo mode - using demo source");
        return Box::new(DemoSource::new());
    }

    match CommandSource::from_command(&config.scan_command, config.io_timeout()) {
        Some(source) => {
            log::info!("Scanning via {:?}", config.scan_command);
            Box::new(source)
        }
        None => {
            log::warn!("No scan_command configured - falling back to demo source");
            Box::new(DemoSource::new())
        }
    }
}

async fn run(config: EngineConfig) -> anyhow::Result<()> {
    // Running without a store only loses the intercept log
    let db_path = config.resolved_db_path();
    let store = match InterceptStore::open(&db_path) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            log::warn!("Intercept store unavailable ({}) - intercepts will not be recorded", e);
            None
        }
    };

    let sink: Arc<dyn AlertSink> = if config.tts_enabled {
        Arc::new(SpeechAlertSink::detect().with_timeout(config.io_timeout()))
    } else {
        Arc::new(LogAlertSink)
    };

    if !config.gps_enabled {
        log::info!("GPS disabled - observer position comes from observations only");
    } else if config.fixed_position.is_none() {
        log::info!("No fixed position configured - mobility needs located observations");
    }

    let mut whitelist_file = WhitelistFile::new(constants::get_whitelist_path(), config.whitelist.clone());
    let whitelist = match whitelist_file.refresh() {
        Ok(Some(whitelist)) => whitelist,
        Ok(None) => config.whitelist.clone(),
        Err(e) => {
            log::warn!("Whitelist file unreadable ({}) - using config whitelist", e);
            config.whitelist.clone()
        }
    };

    let collaborators = Collaborators {
        source: select_source(&config),
        telemetry: Box::new(StaticTelemetry(config.fixed_position.unwrap_or_default())),
        sink,
        store: store.clone(),
    };
    let pipeline = ObservationPipeline::new(whitelist, config.thresholds.clone());

    let mut engine = Engine::new(config.clone());
    engine.start(pipeline, collaborators)?;

    let shutdown_rx = engine
        .subscribe_shutdown()
        .context("Engine has no shutdown channel after start")?;
    let status = tokio::spawn(run_status_loop(
        engine.snapshot(),
        config.consumer_interval(),
        shutdown_rx,
    ));

    // Whitelist file is re-read once per scan interval until Ctrl+C
    let mut ticker = tokio::time::interval(config.scan_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("Failed to listen for Ctrl+C")?;
                break;
            }
            _ = ticker.tick() => match whitelist_file.refresh() {
                Ok(Some(whitelist)) => engine.update_whitelist(whitelist)?,
                Ok(None) => {}
                Err(e) => log::warn!("Whitelist file unreadable ({}) - keeping current list", e),
            },
        }
    }
    log::info!("Shutdown requested");

    let stopped = engine.stop().await;
    let last_cycle = status.await.unwrap_or_default();

    if let Some(pipeline) = stopped? {
        log::info!(
            "Stopped after {} cycles, {} identities tracked, {} alerts",
            last_cycle,
            pipeline.history().identity_count(),
            pipeline.dispatcher().ledger().announced_count()
        );
    }
    if let Some(store) = store {
        match store.count() {
            Ok(n) => log::info!("Intercept log holds {} rows", n),
            Err(e) => log::warn!("Could not count intercepts: {}", e),
        }
    }
    Ok(())
}
