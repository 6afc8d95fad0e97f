//! Alert Module
//!
//! - `dispatcher`: debounce decision (cooldown + once-per-identity)
//! - `sink`: delivery backends (log, speech)
//!
//! The pipeline decides; the engine delivers in the background so a slow
//! speech backend never delays the next scan cycle.

pub mod dispatcher;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use crate::logic::threat::Target;

pub use dispatcher::{AlertDispatcher, AlertLedger, GLOBAL_COOLDOWN_MS};
pub use sink::{AlertError, AlertSink, LogAlertSink, SpeechAlertSink};

/// Spoken phrase for a target
pub fn alert_phrase(target: &Target) -> String {
    if target.is_pacing {
        format!("Warning. Possible tail. {} is pacing you.", target.display_ssid())
    } else {
        let label = target.threat_label.trim_matches(|c| c == '[' || c == ']');
        format!("Threat detected. {}. {} meters.", label, target.distance_m.round() as i64)
    }
}

/// Fire-and-forget delivery bounded by `timeout`. Errors are logged, never returned.
pub fn deliver_detached(
    sink: Arc<dyn AlertSink>,
    phrase: String,
    timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let sink_name = sink.name();
        let task = tokio::task::spawn_blocking(move || sink.deliver(&phrase));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => log::warn!("Alert delivery via {} failed: {}", sink_name, e),
            Ok(Err(e)) => log::warn!("Alert delivery task failed: {}", e),
            Err(_) => log::warn!("Alert delivery via {} timed out after {:?}", sink_name, timeout),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::observation::{Band, Observation};
    use crate::logic::threat::{Confidence, Verdict};
    use parking_lot::Mutex;

    struct CaptureSink(Mutex<Vec<String>>);

    impl AlertSink for CaptureSink {
        fn deliver(&self, phrase: &str) -> Result<(), AlertError> {
            self.0.lock().push(phrase.to_string());
            Ok(())
        }
        fn name(&self) -> &'static str {
            "capture"
        }
    }

    struct SlowSink;

    impl AlertSink for SlowSink {
        fn deliver(&self, _phrase: &str) -> Result<(), AlertError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(())
        }
        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn target(ssid: &str) -> Target {
        let obs = Observation::new(ssid, "00:25:DF:11:22:33", 70, Band::Ghz2_4);
        Target::from_observation(&obs, obs.bssid.clone())
    }

    #[test]
    fn test_phrases() {
        let mut t = target("Unit7");
        t.apply_verdict(&Verdict::threat("[Axon (Taser): Bodycam/Fleet Hub]", Confidence::High));
        t.distance_m = 12.02;
        assert_eq!(alert_phrase(&t), "Threat detected. Axon (Taser): Bodycam/Fleet Hub. 12 meters.");

        t.is_pacing = true;
        assert_eq!(alert_phrase(&t), "Warning. Possible tail. Unit7 is pacing you.");
    }

    #[tokio::test]
    async fn test_deliver_detached_reaches_sink() {
        let sink = Arc::new(CaptureSink(Mutex::new(Vec::new())));
        deliver_detached(sink.clone(), "hello".to_string(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(*sink.0.lock(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_deliver_detached_times_out_quietly() {
        let started = std::time::Instant::now();
        deliver_detached(Arc::new(SlowSink), "slow".to_string(), Duration::from_millis(50))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(450));
    }

    #[cfg(unix)]
    #[test]
    fn test_runtime_exits_promptly_after_hung_speech() {
        let started = std::time::Instant::now();
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();

        let sink = Arc::new(SpeechAlertSink::with_program("sleep").with_timeout(Duration::from_millis(50)));
        rt.block_on(async { deliver_detached(sink, "4".to_string(), Duration::from_millis(50)).await })
            .unwrap();

        // dropping the runtime waits on blocking threads; the killed child frees them
        drop(rt);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
