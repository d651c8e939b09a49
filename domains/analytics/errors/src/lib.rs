use std::time::Duration;

use analytics_models::InvertedRange;
use common_errors::AppError;
use thiserror::Error;

pub const MISSING_RANGE_MESSAGE: &str =
    "Query parameters \"from\" and \"to\" are required";
pub const INVALID_DATE_MESSAGE: &str =
    "Invalid date format. Use ISO 8601 format (e.g., 2024-01-01T00:00:00Z)";

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Rejected request. The message is shown to the caller verbatim.
    #[error("{0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Database(#[from] sql_connection::PgError),
    #[error("Connection error: {0}")]
    Connection(#[from] sql_connection::PoolError),
    #[error("Summary query timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected aggregate value: {0}")]
    Decode(String),
}

impl AnalyticsError {
    pub fn missing_range() -> Self {
        Self::InvalidInput(MISSING_RANGE_MESSAGE.to_string())
    }

    pub fn invalid_date() -> Self {
        Self::InvalidInput(INVALID_DATE_MESSAGE.to_string())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<InvertedRange> for AnalyticsError {
    fn from(err: InvertedRange) -> Self { Self::InvalidInput(err.to_string()) }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidInput(message) => {
                AppError::bad_request(&message)
            }
            other => AppError::internal_server_error(&other.to_string()),
        }
    }
}
