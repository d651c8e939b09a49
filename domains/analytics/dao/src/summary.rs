use std::time::Duration;

use analytics_errors::AnalyticsError;
use analytics_models::{AnalyticsSummary, DateRange, EventTypeCounts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sql_connection::SqlConnect;
use tracing::{debug, instrument};

use crate::SummarySource;

const TOTAL_EVENTS_SQL: &str =
    "SELECT COUNT(*) FROM events WHERE created_at >= $1 AND created_at <= $2";

const UNIQUE_USERS_SQL: &str = "SELECT COUNT(DISTINCT user_id) FROM events \
                                WHERE created_at >= $1 AND created_at <= $2";

const EVENTS_BY_TYPE_SQL: &str = "SELECT event_type, COUNT(*) AS count FROM \
                                  events WHERE created_at >= $1 AND \
                                  created_at <= $2 GROUP BY event_type ORDER \
                                  BY count DESC, event_type ASC";

#[derive(Clone)]
pub struct SummaryDao {
    db: SqlConnect,
    query_timeout: Option<Duration>,
}

impl SummaryDao {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            db,
            query_timeout: None,
        }
    }

    /// Bound the whole three-query join. Elapse fails the summary.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    async fn count(
        &self, sql: &str, from: &DateTime<Utc>, to: &DateTime<Utc>,
    ) -> Result<u64, AnalyticsError> {
        let client = self.db.get_read_client().await?;
        let stmt = client.prepare_cached(sql).await?;
        let row = client.query_one(&stmt, &[from, to]).await?;

        to_count(row.get(0))
    }

    async fn counts_by_type(
        &self, from: &DateTime<Utc>, to: &DateTime<Utc>,
    ) -> Result<EventTypeCounts, AnalyticsError> {
        let client = self.db.get_read_client().await?;
        let stmt = client.prepare_cached(EVENTS_BY_TYPE_SQL).await?;
        let rows = client.query(&stmt, &[from, to]).await?;

        rows.iter()
            .map(|row| Ok((row.get::<_, String>(0), to_count(row.get(1))?)))
            .collect()
    }

    async fn compute(
        &self, range: &DateRange,
    ) -> Result<AnalyticsSummary, AnalyticsError> {
        let from = range.from_instant();
        let to = range.to_instant();

        let (total_events, unique_users, events_by_type) = tokio::try_join!(
            self.count(TOTAL_EVENTS_SQL, &from, &to),
            self.count(UNIQUE_USERS_SQL, &from, &to),
            self.counts_by_type(&from, &to),
        )?;

        Ok(AnalyticsSummary::builder()
            .total_events(total_events)
            .unique_users(unique_users)
            .events_by_type(events_by_type)
            .build())
    }
}

#[async_trait]
impl SummarySource for SummaryDao {
    #[instrument(skip_all, fields(from = range.from(), to = range.to()))]
    async fn summarize(
        &self, range: &DateRange,
    ) -> Result<AnalyticsSummary, AnalyticsError> {
        let summary = match self.query_timeout {
            Some(limit) => {
                tokio::time::timeout(limit, self.compute(range))
                    .await
                    .map_err(|_| AnalyticsError::Timeout(limit))??
            }
            None => self.compute(range).await?,
        };

        debug!(
            total_events = summary.total_events,
            unique_users = summary.unique_users,
            event_types = summary.events_by_type.len(),
            "Computed summary"
        );
        Ok(summary)
    }
}

fn to_count(value: i64) -> Result<u64, AnalyticsError> {
    u64::try_from(value)
        .map_err(|_| AnalyticsError::Decode(format!("negative count {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_count() {
        assert_eq!(to_count(42).unwrap(), 42);
        assert!(matches!(to_count(-1), Err(AnalyticsError::Decode(_))));
    }
}
