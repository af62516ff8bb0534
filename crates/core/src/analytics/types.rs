//! Analytics domain types.

use chrono::NaiveDate;
use patungan_shared::types::{CategoryId, MembershipId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::types::{LedgerSummary, TransactionKind};
use crate::store::DateRange;

/// Grand total and count for one transaction kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Sum of non-deleted amounts.
    pub total: Decimal,
    /// Number of non-deleted transactions.
    pub count: u64,
}

/// Grouped sum per category, as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category, or `None` for uncategorized transactions.
    pub category_id: Option<CategoryId>,
    /// Display name ("Uncategorized" for the `None` bucket).
    pub name: String,
    /// Sum of non-deleted amounts in the bucket.
    pub total: Decimal,
}

/// A category bucket with its share of the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// The category, or `None` for uncategorized transactions.
    pub category_id: Option<CategoryId>,
    /// Display name.
    pub name: String,
    /// Sum of non-deleted amounts in the bucket.
    pub total: Decimal,
    /// Percentage of the grand total; zero when the grand total is zero.
    pub percent: Decimal,
}

/// Category breakdown for one transaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Which kind was aggregated.
    pub kind: TransactionKind,
    /// Sum over all buckets.
    pub grand_total: Decimal,
    /// Buckets, largest first.
    pub buckets: Vec<CategoryShare>,
}

/// Grouped sum per attribution party, as the store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionTotal {
    /// The member attributed, or `None` for the business itself.
    pub membership_id: Option<MembershipId>,
    /// Display name of the member (`None` for the business bucket).
    pub display_name: Option<String>,
    /// Sum of non-deleted amounts in the bucket.
    pub total: Decimal,
}

/// An attribution bucket with its share of the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionShare {
    /// The member attributed, or `None` for the business itself.
    pub membership_id: Option<MembershipId>,
    /// Display name of the member (`None` for the business bucket).
    pub display_name: Option<String>,
    /// Sum of non-deleted amounts in the bucket.
    pub total: Decimal,
    /// Percentage of the grand total; zero when the grand total is zero.
    pub percent: Decimal,
}

/// Attribution breakdown for one transaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionBreakdown {
    /// Which kind was aggregated.
    pub kind: TransactionKind,
    /// Sum over all buckets.
    pub grand_total: Decimal,
    /// Buckets, largest first.
    pub buckets: Vec<AttributionShare>,
}

/// Time bucket width for series queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    /// One bucket per day.
    Daily,
    /// One bucket per ISO week.
    Weekly,
    /// One bucket per calendar month.
    Monthly,
}

impl TimeGranularity {
    /// Returns the string representation of the granularity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Expense/income sums for one time bucket, as the store reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// First day of the bucket.
    pub bucket_start: NaiveDate,
    /// Sum of non-deleted expenses in the bucket.
    pub expenses: Decimal,
    /// Sum of non-deleted incomes in the bucket.
    pub incomes: Decimal,
}

/// One point of the cash-flow time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// First day of the bucket.
    pub bucket_start: NaiveDate,
    /// Sum of non-deleted expenses in the bucket.
    pub expenses: Decimal,
    /// Sum of non-deleted incomes in the bucket.
    pub incomes: Decimal,
    /// `incomes - expenses`.
    pub net: Decimal,
}

/// Cash-flow time series over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Bucket width.
    pub granularity: TimeGranularity,
    /// Points in ascending bucket order.
    pub points: Vec<TimeSeriesPoint>,
}

/// Headline KPIs composed with the ledger summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessOverview {
    /// The range the transaction KPIs cover.
    pub range: DateRange,
    /// Sum of non-deleted expenses in range.
    pub total_expenses: Decimal,
    /// Number of non-deleted expenses in range.
    pub expense_count: u64,
    /// Sum of non-deleted incomes in range.
    pub total_incomes: Decimal,
    /// Number of non-deleted incomes in range.
    pub income_count: u64,
    /// `total_incomes - total_expenses`.
    pub net_cash_flow: Decimal,
    /// Current member balances (full history, not range-scoped).
    pub ledger: LedgerSummary,
}
