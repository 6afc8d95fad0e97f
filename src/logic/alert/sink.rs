//! Alert Delivery Sinks
//!
//! Delivery is best-effort: failures are logged and swallowed by the caller.

use std::time::Duration;

use thiserror::Error;

use crate::constants::DEFAULT_IO_TIMEOUT_MS;
use crate::logic::process::{run_with_timeout, ProcessError};

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("No speech backend available")]
    NoBackend,
    #[error("Speech command failed: {0}")]
    Process(#[from] ProcessError),
}

/// Receives plain-text alert phrases
pub trait AlertSink: Send + Sync {
    fn deliver(&self, phrase: &str) -> Result<(), AlertError>;

    fn name(&self) -> &'static str;
}

// ============================================================================
// LOG SINK
// ============================================================================

/// Writes alerts to the log only (headless default)
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn deliver(&self, phrase: &str) -> Result<(), AlertError> {
        log::warn!("[ALERT] {}", phrase);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// ============================================================================
// SPEECH SINK
// ============================================================================

/// Text-to-speech via `termux-tts-speak` (Android) or `espeak` (Linux)
#[derive(Debug, Clone)]
pub struct SpeechAlertSink {
    program: Option<String>,
    /// The speech process is killed past this
    timeout: Duration,
}

/// Backends probed in order
const SPEECH_PROGRAMS: &[&str] = &["termux-tts-speak", "espeak"];

impl SpeechAlertSink {
    /// Pick the first speech program found on PATH
    pub fn detect() -> Self {
        let program = SPEECH_PROGRAMS
            .iter()
            .find(|p| is_on_path(p))
            .map(|p| p.to_string());

        match &program {
            Some(p) => log::info!("Speech alerts via {}", p),
            None => log::warn!("No speech backend found - alerts will only be logged"),
        }
        Self {
            program,
            timeout: Duration::from_millis(DEFAULT_IO_TIMEOUT_MS),
        }
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: Some(program.to_string()),
            timeout: Duration::from_millis(DEFAULT_IO_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AlertSink for SpeechAlertSink {
    fn deliver(&self, phrase: &str) -> Result<(), AlertError> {
        let program = self.program.as_deref().ok_or(AlertError::NoBackend)?;

        log::warn!("[ALERT] {}", phrase);
        run_with_timeout(program, &[phrase], self.timeout)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "speech"
    }
}

fn is_on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
