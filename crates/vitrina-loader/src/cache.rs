//! In-memory, per-process memoization of load outcomes.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::types::LoadOutcome;

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    outcome: LoadOutcome,
}

/// Remembers one outcome per source key. The lock is never held across an
/// `.await`.
#[derive(Debug, Default)]
pub(crate) struct LoadCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl LoadCache {
    /// Returns the remembered outcome if it is younger than `ttl`. Expired
    /// entries are evicted.
    pub(crate) fn get(&self, key: &str, ttl: Duration) -> Option<LoadOutcome> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < ttl => Some(entry.outcome.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub(crate) fn insert(&self, key: String, outcome: LoadOutcome) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    outcome,
                },
            );
    }

    pub(crate) fn invalidate(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub(crate) fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
