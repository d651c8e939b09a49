use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use utoipa::ToSchema;

use crate::EventTypeCounts;

/// Aggregate view of the events inside a date range.
///
/// `events_by_type` is ordered by count, highest first. Nothing enforces that
/// its counts add up to `total_events`.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TypedBuilder,
    ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_events: u64,
    pub unique_users: u64,
    #[builder(default)]
    #[schema(value_type = HashMap<String, u64>)]
    pub events_by_type: EventTypeCounts,
}
