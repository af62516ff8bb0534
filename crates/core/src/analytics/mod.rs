//! Read-only reporting rollups.
//!
//! The aggregator composes the ledger summary with grouped transaction
//! sums. It owns no state, performs no mutation, and records no audit
//! entries; everything here is a pure function of what the stores return.

pub mod aggregator;
pub mod error;
pub mod types;

pub use aggregator::{percent_of, AnalyticsAggregator, AnalyticsStore};
pub use error::AnalyticsError;
pub use types::{
    AttributionBreakdown, AttributionShare, AttributionTotal, BusinessOverview, CategoryBreakdown,
    CategoryShare, CategoryTotal, PeriodTotal, TimeGranularity, TimeSeries, TimeSeriesPoint,
    TransactionTotals,
};
