//! Last-request-wins tagging for highlight jobs.
//!
//! A view starts a job with [`HighlightRequests::begin`] and hands the result
//! back through [`HighlightRequests::accept`]. Only the newest ticket for a key
//! is accepted; late results for superseded parameters are dropped.
//! Keys are caller-chosen, typically a tab id plus pane (`"tab-01H..:left"`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    key: String,
    generation: u64,
}

impl RequestTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct HighlightRequests {
    latest: Mutex<HashMap<String, u64>>,
    counter: AtomicU64,
}

impl HighlightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `key`, superseding any in-flight one.
    pub fn begin(&self, key: &str) -> RequestTicket {
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        latest.insert(key.to_string(), generation);
        RequestTicket {
            key: key.to_string(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        latest.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Returns `lines` if `ticket` is still the newest request for its key.
    pub fn accept(&self, ticket: &RequestTicket, lines: Vec<String>) -> Option<Vec<String>> {
        if self.is_current(ticket) {
            Some(lines)
        } else {
            debug!(
                key = %ticket.key,
                generation = ticket.generation,
                "Discarding stale highlight result"
            );
            None
        }
    }

    /// Drops tracking for `key`; outstanding tickets for it become stale.
    pub fn forget(&self, key: &str) {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        latest.remove(key);
    }

    /// Drops tracking for every key.
    pub fn clear(&self) {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        latest.clear();
    }
}
