//! The analytics aggregator.

use std::sync::Arc;

use async_trait::async_trait;
use patungan_shared::types::BusinessId;
use rust_decimal::Decimal;

use super::error::AnalyticsError;
use super::types::{
    AttributionBreakdown, AttributionShare, AttributionTotal, BusinessOverview, CategoryBreakdown,
    CategoryShare, CategoryTotal, PeriodTotal, TimeGranularity, TimeSeries, TimeSeriesPoint,
    TransactionTotals,
};
use crate::ledger::types::TransactionKind;
use crate::ledger::LedgerEngine;
use crate::store::{DateRange, StoreError};

/// Grouped-aggregation boundary over the transaction store.
///
/// All queries exclude soft-deleted transactions.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Grand total and count for one kind within `range`.
    async fn totals(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<TransactionTotals, StoreError>;

    /// Sums grouped by category within `range`.
    async fn totals_by_category(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<Vec<CategoryTotal>, StoreError>;

    /// Sums grouped by attribution party within `range`.
    async fn totals_by_attribution(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<Vec<AttributionTotal>, StoreError>;

    /// Expense/income sums grouped by time bucket within `range`, ascending
    /// bucket order.
    async fn totals_by_period(
        &self,
        business_id: BusinessId,
        granularity: TimeGranularity,
        range: DateRange,
    ) -> Result<Vec<PeriodTotal>, StoreError>;
}

/// Divides `part` by `whole` as a percentage, rounded to two decimal
/// places. Zero when `whole` is zero.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// Read-only rollups over the transaction store and the ledger engine.
#[derive(Clone)]
pub struct AnalyticsAggregator {
    store: Arc<dyn AnalyticsStore>,
    ledger: LedgerEngine,
}

impl AnalyticsAggregator {
    /// Creates an aggregator over the injected store and engine.
    #[must_use]
    pub fn new(store: Arc<dyn AnalyticsStore>, ledger: LedgerEngine) -> Self {
        Self { store, ledger }
    }

    /// Headline KPIs for the range, composed with the current ledger
    /// summary.
    pub async fn overview(
        &self,
        business_id: BusinessId,
        range: DateRange,
    ) -> Result<BusinessOverview, AnalyticsError> {
        let expenses = self
            .store
            .totals(business_id, TransactionKind::Expense, range)
            .await?;
        let incomes = self
            .store
            .totals(business_id, TransactionKind::Income, range)
            .await?;
        let ledger = self.ledger.business_summary(business_id).await?;

        Ok(BusinessOverview {
            range,
            total_expenses: expenses.total,
            expense_count: expenses.count,
            total_incomes: incomes.total,
            income_count: incomes.count,
            net_cash_flow: incomes.total - expenses.total,
            ledger,
        })
    }

    /// Grouped sums by category with each bucket's share of the grand
    /// total, largest bucket first.
    pub async fn category_breakdown(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<CategoryBreakdown, AnalyticsError> {
        let rows = self
            .store
            .totals_by_category(business_id, kind, range)
            .await?;
        let grand_total: Decimal = rows.iter().map(|r| r.total).sum();

        let mut buckets: Vec<CategoryShare> = rows
            .into_iter()
            .map(|row| CategoryShare {
                percent: percent_of(row.total, grand_total),
                category_id: row.category_id,
                name: row.name,
                total: row.total,
            })
            .collect();
        buckets.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(CategoryBreakdown {
            kind,
            grand_total,
            buckets,
        })
    }

    /// Grouped sums by attribution party (business itself or a member)
    /// with each bucket's share of the grand total, largest bucket first.
    pub async fn attribution_breakdown(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<AttributionBreakdown, AnalyticsError> {
        let rows = self
            .store
            .totals_by_attribution(business_id, kind, range)
            .await?;
        let grand_total: Decimal = rows.iter().map(|r| r.total).sum();

        let mut buckets: Vec<AttributionShare> = rows
            .into_iter()
            .map(|row| AttributionShare {
                percent: percent_of(row.total, grand_total),
                membership_id: row.membership_id,
                display_name: row.display_name,
                total: row.total,
            })
            .collect();
        buckets.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(AttributionBreakdown {
            kind,
            grand_total,
            buckets,
        })
    }

    /// Cash-flow series bucketed by `granularity`, ascending.
    pub async fn time_series(
        &self,
        business_id: BusinessId,
        granularity: TimeGranularity,
        range: DateRange,
    ) -> Result<TimeSeries, AnalyticsError> {
        let rows = self
            .store
            .totals_by_period(business_id, granularity, range)
            .await?;

        let points = rows
            .into_iter()
            .map(|row| TimeSeriesPoint {
                bucket_start: row.bucket_start,
                expenses: row.expenses,
                incomes: row.incomes,
                net: row.incomes - row.expenses,
            })
            .collect();

        Ok(TimeSeries {
            granularity,
            points,
        })
    }
}
