/**
 * In-Memory Fast Store Backend
 *
 * Single-process stand-in for Redis, used for local development and
 * tests. All state lives behind one mutex, which trivially satisfies
 * the atomicity contract of `record_in_window` inside a single process.
 */

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::cache::{FastStore, FastStoreError};

/// Cached string value with its expiry deadline.
struct StoredValue {
    value: String,
    expires_at: Instant,
}

/// Sliding-window entries for one key.
///
/// `expires_at_ms` mirrors the Redis key TTL: the entry is forgotten
/// when it has not been touched for a full window.
#[derive(Default)]
struct WindowEntry {
    timestamps: Vec<u64>,
    expires_at_ms: u64,
}

/// In-memory fast store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, StoredValue>,
    windows: HashMap<String, WindowEntry>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FastStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FastStoreError> {
        let mut inner = self.inner.lock().unwrap();
        let expired = match inner.values.get(key) {
            Some(stored) if stored.expires_at > Instant::now() => {
                return Ok(Some(stored.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.values.remove(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), FastStoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.values.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn record_in_window(
        &self,
        key: &str,
        now_ms: u64,
        window: Duration,
    ) -> Result<u64, FastStoreError> {
        let window_ms = window.as_millis() as u64;
        let window_start = now_ms.saturating_sub(window_ms);

        let mut inner = self.inner.lock().unwrap();
        let entry = inner.windows.entry(key.to_string()).or_default();

        // Key expired between touches: start from an empty window.
        if entry.expires_at_ms != 0 && now_ms >= entry.expires_at_ms {
            entry.timestamps.clear();
        }

        entry.timestamps.retain(|&ts| ts >= window_start);
        entry.timestamps.push(now_ms);
        entry.expires_at_ms = now_ms.saturating_add(window_ms);

        Ok(entry.timestamps.len() as u64)
    }
}
