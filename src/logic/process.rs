//! Bounded child processes
//!
//! External tools (speech backends, scanner commands) run under a deadline.
//! A child still running at the deadline is killed and reaped, so no blocking
//! thread outlives its timeout.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} did not finish within {1:?}, killed")]
    Timeout(String, Duration),
    #[error("{0} exited with status {1}")]
    ExitStatus(String, i32),
}

/// Run `program` with `args`, returning its stdout.
///
/// Stdout is drained on a helper thread so a chatty child cannot stall on a
/// full pipe. On timeout the child is killed and its output discarded.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<Vec<u8>, ProcessError> {
    let spawn_err = |source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(spawn_err)?;

    let reader = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = out.read_to_end(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                log::warn!("{} exceeded {:?}, killed", program, timeout);
                return Err(ProcessError::Timeout(program.to_string(), timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(spawn_err(e));
            }
        }
    };

    let stdout = reader.and_then(|h| h.join().ok()).unwrap_or_default();

    if status.success() {
        Ok(stdout)
    } else {
        Err(ProcessError::ExitStatus(program.to_string(), status.code().unwrap_or(-1)))
    }
}
