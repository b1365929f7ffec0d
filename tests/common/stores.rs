//! Fast-store test doubles

use std::time::Duration;

use async_trait::async_trait;
use sketchsync::cache::{FastStore, FastStoreError};

/// A fast store whose every operation fails, standing in for an
/// unreachable Redis.
pub struct FailingStore;

#[async_trait]
impl FastStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, FastStoreError> {
        Err(FastStoreError::Unavailable("connection refused".to_string()))
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), FastStoreError> {
        Err(FastStoreError::Unavailable("connection refused".to_string()))
    }

    async fn record_in_window(
        &self,
        _key: &str,
        _now_ms: u64,
        _window: Duration,
    ) -> Result<u64, FastStoreError> {
        Err(FastStoreError::Unavailable("connection refused".to_string()))
    }
}
