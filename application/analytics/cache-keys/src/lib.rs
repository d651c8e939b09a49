use analytics_models::AnalyticsSummary;
use redis_connection::{cache_key, core::Json};

// Boundaries are used exactly as supplied, so differently spelled equal
// instants land under different keys.
cache_key!(SummaryCacheKey::<Json<AnalyticsSummary>> => "analytics:summary:{}:{}"[from: str, to: str]);

#[cfg(test)]
mod tests {
    use redis_connection::core::CacheKey;

    use super::*;

    #[test]
    fn test_summary_key_format() {
        let key = SummaryCacheKey
            .get_key_with_args(("2024-01-01T00:00:00Z", "2024-01-31T23:59:59Z"));

        assert_eq!(
            key,
            "analytics:summary:2024-01-01T00:00:00Z:2024-01-31T23:59:59Z"
        );
    }

    #[test]
    fn test_equal_instants_get_distinct_keys() {
        let utc = SummaryCacheKey
            .get_key_with_args(("2024-01-01T00:00:00Z", "2024-01-02"));
        let offset = SummaryCacheKey
            .get_key_with_args(("2024-01-01T01:00:00+01:00", "2024-01-02"));

        assert_ne!(utc, offset);
    }
}
