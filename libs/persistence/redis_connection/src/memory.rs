use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::{Expiry, future::Cache};

use crate::{
    config::MemoryConfig,
    store::{CacheStore, CacheStoreError},
};

#[derive(Clone)]
struct Entry {
    value: Bytes,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &Entry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &Entry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store with the same get/set-with-expiry contract as Redis.
/// Selected for single-process deployments and used as a test double.
#[derive(Clone)]
pub struct MemoryCacheStore {
    cache: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(config: MemoryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self { Self::new(MemoryConfig::default()) }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheStoreError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set_ex(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        self.cache
            .insert(key.to_string(), Entry { value, ttl })
            .await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheStoreError> { Ok(()) }

    fn provider_name(&self) -> &'static str { "memory" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_set_then_get() {
        let store = MemoryCacheStore::default();

        store
            .set_ex("k", Bytes::from_static(b"v"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("k").await.unwrap(),
            Some(Bytes::from_static(b"v"))
        );
        assert_eq!(store.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites_whole_entry() {
        let store = MemoryCacheStore::default();

        store
            .set_ex("k", Bytes::from_static(b"first"), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_ex("k", Bytes::from_static(b"second"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("k").await.unwrap(),
            Some(Bytes::from_static(b"second"))
        );
    }

    #[tokio::test]
    async fn test_memory_store_entry_expires() {
        let store = MemoryCacheStore::default();

        store
            .set_ex("k", Bytes::from_static(b"v"), Duration::from_millis(200))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
