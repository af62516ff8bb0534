//! Balance aggregate repository.

use async_trait::async_trait;
use patungan_core::ledger::{BalanceSource, BalanceTotals};
use patungan_core::store::StoreError;
use patungan_shared::types::{BusinessId, MembershipId};
use rust_decimal::Decimal;
use sea_orm::{
    AccessMode, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IsolationLevel,
    QueryFilter, QuerySelect, TransactionTrait,
};

use super::store_err;
use crate::entities::sea_orm_active_enums::{SettlementDirection, TransactionKind};
use crate::entities::{settlements, transactions};

/// Balance aggregate reads backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn sum_transactions<C: ConnectionTrait>(
        conn: &C,
        business_id: BusinessId,
        membership_id: MembershipId,
        kind: TransactionKind,
    ) -> Result<Decimal, sea_orm::DbErr> {
        let amounts: Vec<Decimal> = transactions::Entity::find()
            .filter(transactions::Column::BusinessId.eq(business_id.into_inner()))
            .filter(transactions::Column::AttributedTo.eq(membership_id.into_inner()))
            .filter(transactions::Column::Kind.eq(kind))
            .filter(transactions::Column::IsDeleted.eq(false))
            .select_only()
            .column(transactions::Column::Amount)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(amounts.into_iter().sum())
    }

    async fn sum_settlements<C: ConnectionTrait>(
        conn: &C,
        business_id: BusinessId,
        membership_id: MembershipId,
        direction: SettlementDirection,
    ) -> Result<Decimal, sea_orm::DbErr> {
        let amounts: Vec<Decimal> = settlements::Entity::find()
            .filter(settlements::Column::BusinessId.eq(business_id.into_inner()))
            .filter(settlements::Column::MembershipId.eq(membership_id.into_inner()))
            .filter(settlements::Column::Direction.eq(direction))
            .select_only()
            .column(settlements::Column::Amount)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(amounts.into_iter().sum())
    }
}

#[async_trait]
impl BalanceSource for LedgerRepository {
    /// Reads the four balance aggregates inside one repeatable-read,
    /// read-only transaction so the balance never mixes pre- and
    /// post-commit data from concurrent writers.
    async fn balance_totals(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<BalanceTotals, StoreError> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .map_err(store_err)?;

        let paid_out_of_pocket =
            Self::sum_transactions(&txn, business_id, membership_id, TransactionKind::Expense)
                .await
                .map_err(store_err)?;
        let received_personally =
            Self::sum_transactions(&txn, business_id, membership_id, TransactionKind::Income)
                .await
                .map_err(store_err)?;
        let settlements_received = Self::sum_settlements(
            &txn,
            business_id,
            membership_id,
            SettlementDirection::BusinessToMember,
        )
        .await
        .map_err(store_err)?;
        let settlements_paid = Self::sum_settlements(
            &txn,
            business_id,
            membership_id,
            SettlementDirection::MemberToBusiness,
        )
        .await
        .map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;

        Ok(BalanceTotals {
            paid_out_of_pocket,
            received_personally,
            settlements_received,
            settlements_paid,
        })
    }
}
