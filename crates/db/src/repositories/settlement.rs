//! Settlement repository.

use async_trait::async_trait;
use chrono::Utc;
use patungan_core::ledger::{HistoryFilter, Settlement, SettlementStore};
use patungan_core::store::StoreError;
use patungan_shared::types::{BusinessId, MembershipId, SettlementId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::store_err;
use crate::entities::settlements;

/// Settlement repository backed by PostgreSQL.
///
/// Settlements are write-once; the only delete path is the engine's
/// compensating rollback for a failed audit write.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_settlement(model: settlements::Model) -> Settlement {
        Settlement {
            id: SettlementId::from_uuid(model.id),
            business_id: BusinessId::from_uuid(model.business_id),
            membership_id: MembershipId::from_uuid(model.membership_id),
            direction: model.direction.into(),
            amount: model.amount,
            note: model.note,
            settlement_date: model.settlement_date,
            created_by: UserId::from_uuid(model.created_by),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl SettlementStore for SettlementRepository {
    async fn list_settlements(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        filter: &HistoryFilter,
    ) -> Result<Vec<Settlement>, StoreError> {
        let mut query = settlements::Entity::find()
            .filter(settlements::Column::BusinessId.eq(business_id.into_inner()))
            .filter(settlements::Column::MembershipId.eq(membership_id.into_inner()));

        if let Some(start) = filter.range.start {
            query = query.filter(settlements::Column::SettlementDate.gte(start));
        }
        if let Some(end) = filter.range.end {
            query = query.filter(settlements::Column::SettlementDate.lte(end));
        }

        let models = query
            .order_by_desc(settlements::Column::SettlementDate)
            .order_by_desc(settlements::Column::CreatedAt)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(models.into_iter().map(Self::to_settlement).collect())
    }

    async fn insert_settlement(&self, settlement: &Settlement) -> Result<(), StoreError> {
        let model = settlements::ActiveModel {
            id: Set(settlement.id.into_inner()),
            business_id: Set(settlement.business_id.into_inner()),
            membership_id: Set(settlement.membership_id.into_inner()),
            direction: Set(settlement.direction.into()),
            amount: Set(settlement.amount),
            note: Set(settlement.note.clone()),
            settlement_date: Set(settlement.settlement_date),
            created_by: Set(settlement.created_by.into_inner()),
            created_at: Set(settlement.created_at.into()),
        };

        model.insert(&self.db).await.map_err(store_err)?;
        tracing::debug!(settlement_id = %settlement.id, "settlement recorded");
        Ok(())
    }

    async fn delete_settlement(&self, id: SettlementId) -> Result<(), StoreError> {
        settlements::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        tracing::warn!(settlement_id = %id, "settlement rolled back after failed audit write");
        Ok(())
    }
}
