use std::{sync::Arc, time::Duration};

use analytics_cache_keys::SummaryCacheKey;
use analytics_models::{AnalyticsSummary, DateRange};
use redis_connection::{
    CacheStore, CacheStoreError,
    core::{CacheBinding, CacheTypeBind, Json},
};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_TTL_SECONDS: u64 = 60;

fn default_ttl_seconds() -> u64 { DEFAULT_TTL_SECONDS }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_seconds) }
}

/// Outcome of a cache read. A store failure carries its cause but is
/// otherwise treated like a miss.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(AnalyticsSummary),
    Miss,
    StoreError(CacheStoreError),
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool { matches!(self, Self::Hit(_)) }

    pub fn into_summary(self) -> Option<AnalyticsSummary> {
        match self {
            Self::Hit(summary) => Some(summary),
            Self::Miss | Self::StoreError(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum CacheWrite {
    Stored,
    StoreError(CacheStoreError),
}

impl CacheWrite {
    pub fn is_stored(&self) -> bool { matches!(self, Self::Stored) }
}

/// Exact-match, TTL-bound summary cache in front of the event store.
///
/// Never returns an error: every store failure is logged and folded into
/// [`CacheLookup::StoreError`] or [`CacheWrite::StoreError`].
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SummaryCache {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl(),
        }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn key_for(&self, range: &DateRange) -> String {
        self.bind(range).key().to_string()
    }

    fn bind<'s>(
        &'s self, range: &DateRange,
    ) -> CacheBinding<'s, Json<AnalyticsSummary>> {
        SummaryCacheKey
            .bind_with_args(self.store.as_ref(), (range.from(), range.to()))
    }

    pub async fn get(&self, range: &DateRange) -> CacheLookup {
        let cache = self.bind(range);

        match cache.try_get().await {
            Ok(Some(summary)) => {
                debug!(key = cache.key(), "Summary cache hit");
                CacheLookup::Hit(summary.inner())
            }
            Ok(None) => {
                debug!(key = cache.key(), "Summary cache miss");
                CacheLookup::Miss
            }
            Err(e) => {
                warn!(
                    key = cache.key(),
                    store = self.store.provider_name(),
                    error = %e,
                    "Summary cache read failed, treating as miss"
                );
                CacheLookup::StoreError(e)
            }
        }
    }

    pub async fn put(
        &self, range: &DateRange, summary: &AnalyticsSummary,
    ) -> CacheWrite {
        let cache = self.bind(range);

        match cache
            .set_with_expire(&Json(summary.clone()), self.ttl)
            .await
        {
            Ok(()) => {
                debug!(key = cache.key(), ttl = ?self.ttl, "Summary cached");
                CacheWrite::Stored
            }
            Err(e) => {
                warn!(
                    key = cache.key(),
                    store = self.store.provider_name(),
                    error = %e,
                    "Summary cache write failed"
                );
                CacheWrite::StoreError(e)
            }
        }
    }
}
