//! Audit log repository.

use async_trait::async_trait;
use chrono::{Days, NaiveTime, Utc};
use patungan_core::audit::{AuditAction, AuditEntityType, AuditFilter, AuditLogEntry, AuditStore};
use patungan_core::store::StoreError;
use patungan_shared::types::{AuditLogId, BusinessId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::store_err;
use crate::entities::audit_logs;

/// Audit log repository backed by PostgreSQL.
///
/// The table is append-only and enforced as such by a database trigger;
/// this repository exposes insert and read operations only.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered_query(business_id: BusinessId, filter: &AuditFilter) -> Select<audit_logs::Entity> {
        let mut query = audit_logs::Entity::find()
            .filter(audit_logs::Column::BusinessId.eq(business_id.into_inner()));

        if let Some(action) = filter.action {
            query = query.filter(audit_logs::Column::Action.eq(action.as_str()));
        }
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(audit_logs::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(audit_logs::Column::EntityId.eq(entity_id));
        }
        if let Some(actor_id) = filter.actor_id {
            query = query.filter(audit_logs::Column::ActorId.eq(actor_id.into_inner()));
        }
        if let Some(start) = filter.range.start {
            query = query.filter(
                audit_logs::Column::CreatedAt.gte(start.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(end) = filter.range.end {
            // Inclusive end date: everything before the next midnight.
            let next_midnight = (end + Days::new(1)).and_time(NaiveTime::MIN).and_utc();
            query = query.filter(audit_logs::Column::CreatedAt.lt(next_midnight));
        }
        query
    }

    fn to_entry(model: audit_logs::Model) -> Result<AuditLogEntry, StoreError> {
        let action = AuditAction::parse(&model.action).ok_or_else(|| {
            StoreError::Backend(format!("unknown audit action in store: {}", model.action))
        })?;
        let entity_type = AuditEntityType::parse(&model.entity_type).ok_or_else(|| {
            StoreError::Backend(format!(
                "unknown audit entity type in store: {}",
                model.entity_type
            ))
        })?;

        Ok(AuditLogEntry {
            id: AuditLogId::from_uuid(model.id),
            business_id: BusinessId::from_uuid(model.business_id),
            action,
            entity_type,
            entity_id: model.entity_id,
            changes: model.changes,
            metadata: model.metadata,
            actor_id: UserId::from_uuid(model.actor_id),
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        let model = audit_logs::ActiveModel {
            id: Set(entry.id.into_inner()),
            business_id: Set(entry.business_id.into_inner()),
            action: Set(entry.action.as_str().to_string()),
            entity_type: Set(entry.entity_type.as_str().to_string()),
            entity_id: Set(entry.entity_id),
            changes: Set(entry.changes.clone()),
            metadata: Set(entry.metadata.clone()),
            actor_id: Set(entry.actor_id.into_inner()),
            created_at: Set(entry.created_at.into()),
        };

        model.insert(&self.db).await.map_err(store_err)?;
        tracing::debug!(action = %entry.action, entity = %entry.entity_type, "audit entry recorded");
        Ok(())
    }

    async fn query(
        &self,
        business_id: BusinessId,
        filter: &AuditFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<AuditLogEntry>, u64), StoreError> {
        let total = Self::filtered_query(business_id, filter)
            .count(&self.db)
            .await
            .map_err(store_err)?;

        let models = Self::filtered_query(business_id, filter)
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let entries = models
            .into_iter()
            .map(Self::to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((entries, total))
    }

    async fn list_for_entity(
        &self,
        business_id: BusinessId,
        entity_type: AuditEntityType,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        let models = audit_logs::Entity::find()
            .filter(audit_logs::Column::BusinessId.eq(business_id.into_inner()))
            .filter(audit_logs::Column::EntityType.eq(entity_type.as_str()))
            .filter(audit_logs::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        models.into_iter().map(Self::to_entry).collect()
    }
}
