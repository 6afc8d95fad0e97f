//! Alert Dispatcher
//!
//! Two gates, both must pass:
//! 1. Global cooldown since the last announcement of any identity
//! 2. Identity not yet in the ledger (at most once per lifetime)

use std::collections::HashSet;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum gap between any two announcements (ms)
pub const GLOBAL_COOLDOWN_MS: i64 = 3_000;

// ============================================================================
// LEDGER
// ============================================================================

/// Identities already announced + time of the last announcement
#[derive(Debug, Default)]
pub struct AlertLedger {
    announced: HashSet<String>,
    last_announce_ms: Option<i64>,
}

impl AlertLedger {
    pub fn has_announced(&self, identity: &str) -> bool {
        self.announced.contains(identity)
    }

    pub fn announced_count(&self) -> usize {
        self.announced.len()
    }

    pub fn last_announce_ms(&self) -> Option<i64> {
        self.last_announce_ms
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

#[derive(Debug)]
pub struct AlertDispatcher {
    ledger: AlertLedger,
    cooldown_ms: i64,
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new(GLOBAL_COOLDOWN_MS)
    }
}

impl AlertDispatcher {
    pub fn new(cooldown_ms: i64) -> Self {
        Self {
            ledger: AlertLedger::default(),
            cooldown_ms,
        }
    }

    /// Returns true when the announcement should fire; records it if so.
    ///
    /// Delivery of `text` is the caller's job; the dispatcher only decides.
    pub fn maybe_announce(&mut self, identity: &str, text: &str, now_ms: i64) -> bool {
        if self.ledger.has_announced(identity) {
            return false;
        }

        if let Some(last) = self.ledger.last_announce_ms {
            if now_ms - last < self.cooldown_ms {
                log::debug!("Alert for {} held by cooldown: {}", identity, text);
                return false;
            }
        }

        self.ledger.announced.insert(identity.to_string());
        self.ledger.last_announce_ms = Some(now_ms);
        true
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }
}
