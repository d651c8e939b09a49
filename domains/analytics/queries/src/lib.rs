mod timestamp;

use analytics_errors::AnalyticsError;
use analytics_models::DateRange;
use serde::Deserialize;
use utoipa::IntoParams;

pub use crate::timestamp::parse_timestamp;

/// Raw range parameters as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Inclusive start of the range, ISO 8601
    #[param(example = "2024-01-01T00:00:00Z")]
    pub from: Option<String>,
    /// Inclusive end of the range, ISO 8601
    #[param(example = "2024-01-31T23:59:59Z")]
    pub to: Option<String>,
}

impl SummaryQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Turn the raw parameters into a [`DateRange`].
    ///
    /// Both boundaries must be present and parse, and `from` must not be
    /// after `to`. The original strings are kept untouched on success.
    pub fn validate(&self) -> Result<DateRange, AnalyticsError> {
        let (Some(from), Some(to)) = (self.from.as_deref(), self.to.as_deref())
        else {
            return Err(AnalyticsError::missing_range());
        };

        let (Some(from_instant), Some(to_instant)) =
            (parse_timestamp(from), parse_timestamp(to))
        else {
            return Err(AnalyticsError::invalid_date());
        };

        Ok(DateRange::new(from, from_instant, to, to_instant)?)
    }
}
