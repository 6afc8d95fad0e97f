//! Acquisition Collaborators
//!
//! The core never shells out to scanners itself; it consumes batches from an
//! `ObservationSource` and own position from a `TelemetrySource`.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use crate::logic::observation::{normalize_rssi, Band, Observation, ObserverFix};
use crate::logic::process::{run_with_timeout, ProcessError};

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Scan source unavailable: {0}")]
    Unavailable(String),
    #[error("Scan output could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Scan command failed: {0}")]
    Process(#[from] ProcessError),
}

/// Produces one batch of observations per call
pub trait ObservationSource: Send {
    fn scan(&mut self) -> Result<Vec<Observation>, AcquisitionError>;

    fn name(&self) -> &'static str;
}

/// Own GPS/speed; every field may be missing
pub trait TelemetrySource: Send {
    fn current_fix(&mut self) -> ObserverFix;
}

// ============================================================================
// TELEMETRY
// ============================================================================

/// Fixed telemetry (tests, stationary deployments, or GPS disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTelemetry(pub ObserverFix);

impl TelemetrySource for StaticTelemetry {
    fn current_fix(&mut self) -> ObserverFix {
        self.0
    }
}

// ============================================================================
// DEMO SOURCE
// ============================================================================

/// Fake access points used when no real scanner is present
pub struct DemoSource {
    rng: StdRng,
    networks: Vec<(String, String, Band)>,
}

impl DemoSource {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic demo data
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let mut networks: Vec<(String, String, Band)> = (0..5u8)
            .map(|i| {
                (
                    format!("DEMO_{}", rng.gen_range(100..1000)),
                    format!("02:DE:40:00:00:{:02X}", i),
                    Band::Ghz2_4,
                )
            })
            .collect();
        networks.push(("PoliceMDT1".to_string(), "02:DE:40:00:01:00".to_string(), Band::Ghz5));
        networks.push(("".to_string(), "00:25:DF:11:22:33".to_string(), Band::Ghz2_4));

        Self { rng, networks }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationSource for DemoSource {
    fn scan(&mut self) -> Result<Vec<Observation>, AcquisitionError> {
        let rng = &mut self.rng;
        Ok(self
            .networks
            .iter()
            .map(|(ssid, bssid, band)| {
                Observation::new(ssid, bssid, rng.gen_range(20..=90), *band).with_encryption("WPA")
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

// ============================================================================
// COMMAND SOURCE
// ============================================================================

/// One access point as printed by an external scanner.
///
/// Accepts the `termux-wifi-scaninfo` shape (`rssi` dBm, `frequency_mhz`) as
/// well as pre-normalized `signal` / `band`.
#[derive(Debug, Deserialize)]
struct ScanRecord {
    #[serde(default)]
    ssid: String,
    bssid: String,
    signal: Option<u8>,
    rssi: Option<i32>,
    band: Option<Band>,
    frequency_mhz: Option<u32>,
    encryption: Option<String>,
}

impl ScanRecord {
    fn into_observation(self) -> Observation {
        let signal = self
            .signal
            .or(self.rssi.map(normalize_rssi))
            .unwrap_or(0);
        let band = self
            .band
            .or(self.frequency_mhz.map(Band::from_frequency_mhz))
            .unwrap_or(Band::Unknown);

        let obs = Observation::new(&self.ssid, &self.bssid, signal, band);
        match self.encryption {
            Some(enc) => obs.with_encryption(&enc),
            None => obs,
        }
    }
}

/// Parse a scanner's JSON array output
pub fn parse_scan_output(raw: &[u8]) -> Result<Vec<Observation>, AcquisitionError> {
    let records: Vec<ScanRecord> = serde_json::from_slice(raw)?;
    Ok(records.into_iter().map(ScanRecord::into_observation).collect())
}

/// Runs an external scanner command each cycle and parses its JSON output.
/// The command is killed if it runs past `timeout`.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSource {
    /// `command[0]` is the program, the rest its arguments. `None` if empty.
    pub fn from_command(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

impl ObservationSource for CommandSource {
    fn scan(&mut self) -> Result<Vec<Observation>, AcquisitionError> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let raw = run_with_timeout(&self.program, &args, self.timeout)?;
        parse_scan_output(&raw)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}
