use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use redis_connection::{CacheStore, CacheStoreError};
use sql_connection::SqlConnect;

use crate::TestPostgresContainer;

/// Wrap the container's pool in the handle the DAOs expect
pub fn create_sql_connect(container: &TestPostgresContainer) -> SqlConnect {
    SqlConnect::new(container.pool.clone())
}

/// Insert one event row
pub async fn insert_event(
    container: &TestPostgresContainer, user_id: &str, event_type: &str,
    created_at: DateTime<Utc>,
) -> Result<()> {
    let client = container.pool.get().await?;
    client
        .execute(
            "INSERT INTO events (user_id, event_type, created_at) VALUES ($1, \
             $2, $3)",
            &[&user_id, &event_type, &created_at],
        )
        .await?;
    Ok(())
}

/// Insert many events sharing one timestamp
pub async fn insert_events(
    container: &TestPostgresContainer, rows: &[(&str, &str)],
    created_at: DateTime<Utc>,
) -> Result<()> {
    for (user_id, event_type) in rows {
        insert_event(container, user_id, event_type, created_at).await?;
    }
    Ok(())
}

/// Parse an RFC 3339 literal, panicking on typos in test fixtures
pub fn ts(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| panic!("bad fixture timestamp {value}: {e}"))
}

/// Cache store that fails every operation, standing in for an unreachable
/// Redis.
#[derive(Debug, Default, Clone)]
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheStoreError> {
        Err(CacheStoreError::Unavailable("connection refused".into()))
    }

    async fn set_ex(
        &self, _key: &str, _value: Bytes, _ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        Err(CacheStoreError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), CacheStoreError> {
        Err(CacheStoreError::Unavailable("connection refused".into()))
    }

    fn provider_name(&self) -> &'static str { "failing" }
}

/// Cache store whose stored payloads are always garbage.
#[derive(Debug, Default, Clone)]
pub struct CorruptCacheStore;

#[async_trait]
impl CacheStore for CorruptCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheStoreError> {
        Ok(Some(Bytes::from_static(b"{\"totalEvents\":")))
    }

    async fn set_ex(
        &self, _key: &str, _value: Bytes, _ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheStoreError> { Ok(()) }

    fn provider_name(&self) -> &'static str { "corrupt" }
}
