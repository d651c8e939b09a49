pub mod date_range;
pub mod event_type_counts;
pub mod summary;

pub use date_range::{DateRange, InvertedRange};
pub use event_type_counts::EventTypeCounts;
pub use summary::AnalyticsSummary;
