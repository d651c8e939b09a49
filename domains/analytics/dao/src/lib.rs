mod summary;

use analytics_errors::AnalyticsError;
use analytics_models::{AnalyticsSummary, DateRange};
use async_trait::async_trait;

pub use crate::summary::SummaryDao;

/// Computes summaries straight from the event store. Implementations never
/// cache.
#[async_trait]
pub trait SummarySource: Send + Sync {
    async fn summarize(
        &self, range: &DateRange,
    ) -> Result<AnalyticsSummary, AnalyticsError>;
}
