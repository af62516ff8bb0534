//! Transaction repository: listings and analytics aggregates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use patungan_core::analytics::{
    AnalyticsStore, AttributionTotal, CategoryTotal, PeriodTotal, TimeGranularity,
    TransactionTotals,
};
use patungan_core::ledger::{
    HistoryFilter, TransactionKind as CoreKind, TransactionRecord, TransactionStore,
};
use patungan_core::store::{DateRange, StoreError};
use patungan_shared::types::{BusinessId, CategoryId, MembershipId, TransactionId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::store_err;
use crate::entities::sea_orm_active_enums::TransactionKind;
use crate::entities::{categories, memberships, transactions, users};

/// Transaction repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Non-deleted transactions of one kind in a business, range applied.
    fn base_query(
        business_id: BusinessId,
        kind: CoreKind,
        range: DateRange,
    ) -> Select<transactions::Entity> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::BusinessId.eq(business_id.into_inner()))
            .filter(transactions::Column::Kind.eq(TransactionKind::from(kind)))
            .filter(transactions::Column::IsDeleted.eq(false));

        if let Some(start) = range.start {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = range.end {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }
        query
    }

    fn to_record(model: transactions::Model) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::from_uuid(model.id),
            kind: model.kind.into(),
            amount: model.amount,
            category_id: model.category_id.map(CategoryId::from_uuid),
            attributed_to: model.attributed_to.map(MembershipId::from_uuid),
            note: model.note,
            transaction_date: model.transaction_date,
        }
    }
}

/// First day of the bucket containing `date`.
pub(crate) fn bucket_start(granularity: TimeGranularity, date: NaiveDate) -> NaiveDate {
    match granularity {
        TimeGranularity::Daily => date,
        TimeGranularity::Weekly => {
            date - Days::new(u64::from(date.weekday().num_days_from_monday()))
        }
        TimeGranularity::Monthly => date.with_day(1).expect("day 1 always exists"),
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn list_attributed(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        kind: CoreKind,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let models = Self::base_query(business_id, kind, filter.range)
            .filter(transactions::Column::AttributedTo.eq(membership_id.into_inner()))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(Self::to_record).collect())
    }
}

#[async_trait]
impl AnalyticsStore for TransactionRepository {
    async fn totals(
        &self,
        business_id: BusinessId,
        kind: CoreKind,
        range: DateRange,
    ) -> Result<TransactionTotals, StoreError> {
        let amounts: Vec<rust_decimal::Decimal> = Self::base_query(business_id, kind, range)
            .select_only()
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(TransactionTotals {
            count: amounts.len() as u64,
            total: amounts.into_iter().sum(),
        })
    }

    async fn totals_by_category(
        &self,
        business_id: BusinessId,
        kind: CoreKind,
        range: DateRange,
    ) -> Result<Vec<CategoryTotal>, StoreError> {
        let rows: Vec<(Option<Uuid>, rust_decimal::Decimal)> =
            Self::base_query(business_id, kind, range)
                .select_only()
                .column(transactions::Column::CategoryId)
                .column(transactions::Column::Amount)
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(store_err)?;

        let mut groups: BTreeMap<Option<Uuid>, rust_decimal::Decimal> = BTreeMap::new();
        for (category_id, amount) in rows {
            *groups.entry(category_id).or_default() += amount;
        }

        let category_ids: Vec<Uuid> = groups.keys().filter_map(|id| *id).collect();
        let names: BTreeMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(groups
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                name: category_id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                category_id: category_id.map(CategoryId::from_uuid),
                total,
            })
            .collect())
    }

    async fn totals_by_attribution(
        &self,
        business_id: BusinessId,
        kind: CoreKind,
        range: DateRange,
    ) -> Result<Vec<AttributionTotal>, StoreError> {
        let rows: Vec<(Option<Uuid>, rust_decimal::Decimal)> =
            Self::base_query(business_id, kind, range)
                .select_only()
                .column(transactions::Column::AttributedTo)
                .column(transactions::Column::Amount)
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(store_err)?;

        let mut groups: BTreeMap<Option<Uuid>, rust_decimal::Decimal> = BTreeMap::new();
        for (membership_id, amount) in rows {
            *groups.entry(membership_id).or_default() += amount;
        }

        let membership_ids: Vec<Uuid> = groups.keys().filter_map(|id| *id).collect();
        let names: BTreeMap<Uuid, String> = memberships::Entity::find()
            .filter(memberships::Column::Id.is_in(membership_ids))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .filter_map(|(membership, user)| user.map(|u| (membership.id, u.full_name)))
            .collect();

        Ok(groups
            .into_iter()
            .map(|(membership_id, total)| AttributionTotal {
                display_name: membership_id.and_then(|id| names.get(&id).cloned()),
                membership_id: membership_id.map(MembershipId::from_uuid),
                total,
            })
            .collect())
    }

    async fn totals_by_period(
        &self,
        business_id: BusinessId,
        granularity: TimeGranularity,
        range: DateRange,
    ) -> Result<Vec<PeriodTotal>, StoreError> {
        // Both kinds in one pass; bucketing happens here rather than in SQL
        // so the grouping rules live in one place.
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::BusinessId.eq(business_id.into_inner()))
            .filter(transactions::Column::IsDeleted.eq(false));
        if let Some(start) = range.start {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = range.end {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }

        let rows: Vec<(NaiveDate, TransactionKind, rust_decimal::Decimal)> = query
            .select_only()
            .column(transactions::Column::TransactionDate)
            .column(transactions::Column::Kind)
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let mut buckets: BTreeMap<NaiveDate, (rust_decimal::Decimal, rust_decimal::Decimal)> =
            BTreeMap::new();
        for (date, kind, amount) in rows {
            let entry = buckets.entry(bucket_start(granularity, date)).or_default();
            match kind {
                TransactionKind::Expense => entry.0 += amount,
                TransactionKind::Income => entry.1 += amount,
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(start, (expenses, incomes))| PeriodTotal {
                bucket_start: start,
                expenses,
                incomes,
            })
            .collect())
    }
}
