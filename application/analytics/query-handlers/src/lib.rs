mod summary_cache;

use std::sync::Arc;

use analytics_dao::SummarySource;
use analytics_errors::AnalyticsError;
use analytics_queries::SummaryQuery;
use analytics_responses::SummaryResponse;
use tracing::instrument;

pub use crate::summary_cache::{
    CacheConfig, CacheLookup, CacheWrite, DEFAULT_TTL_SECONDS, SummaryCache,
};

/// Cache-aside read path for range summaries: validate, try the cache,
/// fall back to the event store and remember the result.
#[derive(Clone)]
pub struct GetSummaryQueryHandler {
    source: Arc<dyn SummarySource>,
    cache: SummaryCache,
}

impl GetSummaryQueryHandler {
    pub fn new(source: Arc<dyn SummarySource>, cache: SummaryCache) -> Self {
        Self { source, cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: SummaryQuery,
    ) -> Result<SummaryResponse, AnalyticsError> {
        let range = query.validate()?;

        if let Some(summary) = self.cache.get(&range).await.into_summary() {
            return Ok(SummaryResponse::cached(summary));
        }

        // Failures are logged once, when rendered as a 500.
        let summary = self.source.summarize(&range).await?;

        // A failed write is already logged and does not affect the response.
        let _ = self.cache.put(&range, &summary).await;

        Ok(SummaryResponse::fresh(summary))
    }
}
