use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::value::CacheError;

/// Operational failure talking to a cache store.
#[derive(Debug, thiserror::Error)]
pub enum CacheStoreError {
    #[error("Cache pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
    #[error("Cache command error: {0}")]
    Command(#[from] deadpool_redis::redis::RedisError),
    #[error("Cache payload error: {0}")]
    Payload(#[from] CacheError),
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value boundary the application caches through. Entries are only ever
/// read or written whole; expiry belongs to the store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheStoreError>;

    /// Write `value` under `key`, replacing any previous entry, expiring after
    /// `ttl`.
    async fn set_ex(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> Result<(), CacheStoreError>;

    async fn ping(&self) -> Result<(), CacheStoreError>;

    /// Release pooled resources. Later calls fail with a store error.
    fn close(&self) {}

    fn provider_name(&self) -> &'static str;
}
