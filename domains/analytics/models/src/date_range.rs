use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("\"from\" date must be before or equal to \"to\" date")]
pub struct InvertedRange;

/// A validated, inclusive time window.
///
/// Keeps the boundaries exactly as the caller spelled them alongside the
/// parsed instants. The raw strings feed cache key derivation, the instants
/// feed the event-store queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    from: String,
    to: String,
    from_instant: DateTime<Utc>,
    to_instant: DateTime<Utc>,
}

impl DateRange {
    pub fn new(
        from: impl Into<String>, from_instant: DateTime<Utc>,
        to: impl Into<String>, to_instant: DateTime<Utc>,
    ) -> Result<Self, InvertedRange> {
        if from_instant > to_instant {
            return Err(InvertedRange);
        }

        Ok(Self {
            from: from.into(),
            to: to.into(),
            from_instant,
            to_instant,
        })
    }

    pub fn from(&self) -> &str { &self.from }

    pub fn to(&self) -> &str { &self.to }

    pub fn from_instant(&self) -> DateTime<Utc> { self.from_instant }

    pub fn to_instant(&self) -> DateTime<Utc> { self.to_instant }
}
