//! Time-boxed, in-memory store of fetched weather records.
//!
//! Entries are keyed by normalized place name (see [`crate::model::cache_key`])
//! and expire lazily: a stale entry is only removed when a lookup finds it.

use parking_lot::Mutex;
use std::{collections::HashMap, time::Duration};
use tokio::time::Instant;

use crate::model::WeatherRecord;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: WeatherRecord,
    captured_at: Instant,
}

#[derive(Debug)]
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl CacheStore {
    pub fn new(ttl: Duration, enabled: bool) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the record for `key` if it is still fresh; purge it otherwise.
    pub fn get(&self, key: &str) -> Option<WeatherRecord> {
        if !self.enabled {
            return None;
        }

        let mut entries = self.entries.lock();
        let fresh = entries.get(key)?.captured_at.elapsed() < self.ttl;

        if fresh {
            entries.get(key).map(|entry| entry.payload.clone())
        } else {
            tracing::debug!(key, "evicting stale cache entry");
            entries.remove(key);
            None
        }
    }

    /// Insert or overwrite `key`, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, record: WeatherRecord) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry { payload: record, captured_at: Instant::now() };
        self.entries.lock().insert(key.into(), entry);
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
