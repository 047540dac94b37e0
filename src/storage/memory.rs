use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::{
    clock::{Clock, SystemClock},
    error::Result,
    storage::FailureStore,
};

#[derive(Debug, Clone, Copy)]
struct FailureEntry {
    count: u32,
    expires_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct FailureTable {
    entries: HashMap<String, FailureEntry>,
    /// Earliest time `record_failure` sweeps the whole table again.
    next_sweep_at: Option<OffsetDateTime>,
}

impl FailureTable {
    fn purge_expired(&mut self, now: OffsetDateTime) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }
}

/// Process-local failure counters. Expired entries are dropped when read,
/// by a sweep that `record_failure` runs at most once per `ttl`, or in bulk
/// through [`InMemoryFailureStore::purge_expired`].
#[derive(Debug)]
pub struct InMemoryFailureStore<C = SystemClock> {
    table: Mutex<FailureTable>,
    clock: C,
}

impl InMemoryFailureStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryFailureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryFailureStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            table: Mutex::new(FailureTable::default()),
            clock,
        }
    }

    /// Drops every expired counter, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.table.lock().await.purge_expired(now)
    }

    /// Number of keys currently held, expired or not.
    pub async fn tracked_keys(&self) -> usize {
        self.table.lock().await.entries.len()
    }
}

impl<C: Clock> FailureStore for InMemoryFailureStore<C> {
    async fn failure_count(&self, key: &str) -> Result<u32> {
        let now = self.clock.now();
        let entries = &mut self.table.lock().await.entries;

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(entry.count),
            Some(_) => {
                entries.remove(key);
                Ok(0)
            }
            None => Ok(0),
        }
    }

    async fn record_failure(&self, key: &str, ttl: Duration) -> Result<u32> {
        let now = self.clock.now();
        let mut table = self.table.lock().await;

        if table.next_sweep_at.is_none_or(|sweep_at| sweep_at <= now) {
            let purged = table.purge_expired(now);
            if purged > 0 {
                tracing::debug!(purged, "swept expired auth failure counters");
            }
            table.next_sweep_at = Some(now + ttl);
        }

        let count = match table.entries.get(key) {
            Some(entry) if entry.expires_at > now => entry.count.saturating_add(1),
            _ => 1,
        };
        table.entries.insert(
            key.to_string(),
            FailureEntry {
                count,
                expires_at: now + ttl,
            },
        );

        Ok(count)
    }
}
