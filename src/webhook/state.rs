//! Process-lifetime listener state: per-event tally and last seen block.
//!
//! Owned by the listener and handed to request handlers through axum `State`.
//! Nothing is persisted; a restart starts from zero.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug)]
struct Tally {
    last_block: String,
    event_counts: BTreeMap<String, u64>,
}

/// Shared, lock-protected listener state.
#[derive(Debug)]
pub struct ListenerState {
    tally: Mutex<Tally>,
    started_at: Instant,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatus {
    pub last_block: String,
    pub event_counts: BTreeMap<String, u64>,
    /// Seconds since the listener started.
    pub uptime: f64,
}

impl Default for ListenerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerState {
    pub fn new() -> Self {
        Self {
            tally: Mutex::new(Tally { last_block: "0".to_string(), event_counts: BTreeMap::new() }),
            started_at: Instant::now(),
        }
    }

    /// Increment the counter for `event` and return the new count.
    pub fn record_event(&self, event: &str) -> u64 {
        let mut tally = self.tally.lock();
        let count = tally.event_counts.entry(event.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn set_last_block(&self, block: &str) {
        self.tally.lock().last_block = block.to_string();
    }

    pub fn last_block(&self) -> String {
        self.tally.lock().last_block.clone()
    }

    pub fn count(&self, event: &str) -> u64 {
        self.tally.lock().event_counts.get(event).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> ListenerStatus {
        let tally = self.tally.lock();
        ListenerStatus {
            last_block: tally.last_block.clone(),
            event_counts: tally.event_counts.clone(),
            uptime: self.started_at.elapsed().as_secs_f64(),
        }
    }
}
