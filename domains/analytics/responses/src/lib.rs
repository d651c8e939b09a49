use analytics_models::AnalyticsSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a successful summary request. `cached` is true only when the
/// summary came out of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub data: AnalyticsSummary,
    pub cached: bool,
}

impl SummaryResponse {
    pub fn fresh(data: AnalyticsSummary) -> Self {
        Self {
            data,
            cached: false,
        }
    }

    pub fn cached(data: AnalyticsSummary) -> Self { Self { data, cached: true } }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self { Self { status: "ok" } }
}
