/**
 * Shared Fast Store
 *
 * This module defines the interface to the shared fast store used for
 * rate-limit bookkeeping and plan caching, together with its two
 * backends:
 *
 * - `RedisStore` - the deployment backend, backed by a Redis connection
 *   manager. This is the only backend that coordinates across multiple
 *   server processes.
 * - `MemoryStore` - a single-process backend holding everything behind
 *   one mutex. Used for local development without Redis and throughout
 *   the test suite.
 *
 * # Write Patterns
 *
 * The store is mutated through exactly two operations: plain
 * set-with-TTL (plan cache) and the atomic `record_in_window`
 * transaction (rate limiting). Handlers never touch the store through
 * any other path, which keeps concurrent processes free of lost-update
 * races.
 */

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// Fast store failure
///
/// Callers in the rate-limit path treat any variant as a signal to fail
/// open; everywhere else it surfaces as a generic dependency error.
#[derive(Debug, Error)]
pub enum FastStoreError {
    /// Error returned by the Redis client
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// The store cannot be reached or refused the operation
    #[error("fast store unavailable: {0}")]
    Unavailable(String),
}

/// Interface to the shared fast store
///
/// Implementations must make `record_in_window` indivisible with
/// respect to concurrent invocations for the same key: no two callers
/// may observe an inconsistent intermediate count.
#[async_trait]
pub trait FastStore: Send + Sync {
    /// Fetch a cached string value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, FastStoreError>;

    /// Store a string value that expires after `ttl`
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), FastStoreError>;

    /// Atomically update the sliding window for `key` and return the
    /// post-insert entry count
    ///
    /// In one transaction: purge entries strictly older than
    /// `now_ms - window`, record `now_ms` as a new entry, count the
    /// entries now present, and refresh the key's expiry to the window
    /// duration. The new entry is recorded unconditionally, so a call
    /// that pushes the count over a caller-side threshold still extends
    /// the window.
    async fn record_in_window(
        &self,
        key: &str,
        now_ms: u64,
        window: Duration,
    ) -> Result<u64, FastStoreError>;
}
