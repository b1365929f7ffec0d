/**
 * Redis Fast Store Backend
 *
 * Wraps a Redis connection manager behind the `FastStore` interface.
 * The connection manager reconnects on its own after transient network
 * failures; commands issued while disconnected return errors, which the
 * rate-limit path converts into fail-open admissions.
 */

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use crate::cache::{FastStore, FastStoreError};

/// A handler for Redis fast-store interactions.
#[derive(Clone)]
pub struct RedisStore {
    /// The shared connection manager, cloned per operation.
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and build the store.
    ///
    /// # Arguments
    /// * `url` - The redis URL (e.g., "redis://127.0.0.1/").
    pub async fn connect(url: &str) -> Result<Self, FastStoreError> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl FastStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FastStoreError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), FastStoreError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn record_in_window(
        &self,
        key: &str,
        now_ms: u64,
        window: Duration,
    ) -> Result<u64, FastStoreError> {
        let mut conn = self.manager.clone();
        let window_start = now_ms.saturating_sub(window.as_millis() as u64);

        // Members carry a random suffix so concurrent requests landing
        // on the same millisecond remain distinct entries.
        let member = format!("{now_ms}-{}", Uuid::new_v4());

        // MULTI/EXEC keeps purge, insert, count and expiry refresh
        // indivisible with respect to other callers on the same key.
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .zrembyscore(key, "-inf", format!("({window_start}"))
            .ignore()
            .zadd(key, member, now_ms)
            .ignore()
            .zcard(key)
            .expire(key, window.as_secs().max(1) as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count)
    }
}
