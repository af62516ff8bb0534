//! The audit trail recorder and query surface.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use patungan_shared::types::{AuditLogId, BusinessId, PageRequest};
use uuid::Uuid;

use super::error::AuditError;
use super::types::{AuditEntityType, AuditFilter, AuditLogEntry, AuditPage, NewAuditEntry};
use crate::store::StoreError;

/// Append-only audit storage boundary.
///
/// Implementations must never expose update or delete operations; an entry
/// that has been inserted is visible to every later query unchanged.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends one entry.
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), StoreError>;

    /// Returns the entries matching `filter`, newest first, with the total
    /// match count.
    async fn query(
        &self,
        business_id: BusinessId,
        filter: &AuditFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<AuditLogEntry>, u64), StoreError>;

    /// Returns the full history for one entity, newest first.
    async fn list_for_entity(
        &self,
        business_id: BusinessId,
        entity_type: AuditEntityType,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError>;
}

/// The audit trail: records state-changing events and serves queries.
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
}

impl AuditTrail {
    /// Creates a trail over the injected store.
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Appends one immutable entry and returns it with its assigned ID and
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Storage failures propagate. Callers pairing this with a state change
    /// must treat that change as not durably completed and decide whether
    /// to roll it back.
    pub async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, AuditError> {
        let entry = AuditLogEntry {
            id: AuditLogId::new(),
            business_id: entry.business_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            changes: entry.changes,
            metadata: entry.metadata,
            actor_id: entry.actor_id,
            created_at: Utc::now(),
        };
        self.store.insert(&entry).await?;
        Ok(entry)
    }

    /// Filtered, paginated query, newest first.
    pub async fn query(
        &self,
        business_id: BusinessId,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<AuditPage, AuditError> {
        let (entries, total) = self
            .store
            .query(business_id, filter, page.offset(), page.limit())
            .await?;

        let has_more = page.offset() + (entries.len() as u64) < total;
        Ok(AuditPage {
            entries,
            total,
            has_more,
        })
    }

    /// Full unpaginated history for one entity, newest first.
    pub async fn entity_trail(
        &self,
        business_id: BusinessId,
        entity_type: AuditEntityType,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, AuditError> {
        Ok(self
            .store
            .list_for_entity(business_id, entity_type, entity_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::AuditAction;
    use crate::testing::MemoryStore;
    use patungan_shared::types::UserId;
    use serde_json::json;

    fn entry(business_id: BusinessId, actor: UserId) -> NewAuditEntry {
        NewAuditEntry {
            business_id,
            action: AuditAction::CategoryCreated,
            entity_type: AuditEntityType::Category,
            entity_id: Uuid::new_v4(),
            changes: json!({"after": {"name": "Travel"}}),
            metadata: json!({}),
            actor_id: actor,
        }
    }

    #[tokio::test]
    async fn test_record_assigns_id_and_timestamp() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store.clone());
        let business_id = BusinessId::new();

        let recorded = trail.record(entry(business_id, UserId::new())).await.unwrap();
        assert_eq!(recorded.action, AuditAction::CategoryCreated);
        assert_eq!(store.audit_count(), 1);
    }

    #[tokio::test]
    async fn test_record_propagates_store_failure() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store.clone());
        store.fail_next_audit_insert();

        let result = trail.record(entry(BusinessId::new(), UserId::new())).await;
        assert!(matches!(result, Err(AuditError::Store(_))));
        assert_eq!(store.audit_count(), 0);
    }

    #[tokio::test]
    async fn test_query_is_newest_first_and_scoped_to_business() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store.clone());
        let business_id = BusinessId::new();
        let actor = UserId::new();

        let first = trail.record(entry(business_id, actor)).await.unwrap();
        let second = trail.record(entry(business_id, actor)).await.unwrap();
        // An entry in another business never leaks in.
        trail.record(entry(BusinessId::new(), actor)).await.unwrap();

        let page = trail
            .query(business_id, &AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
        assert_eq!(page.entries[0].id, second.id);
        assert_eq!(page.entries[1].id, first.id);
        assert!(page.entries[0].created_at >= page.entries[1].created_at);
    }

    #[tokio::test]
    async fn test_query_filters_by_actor() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store);
        let business_id = BusinessId::new();
        let actor = UserId::new();

        trail.record(entry(business_id, actor)).await.unwrap();
        trail.record(entry(business_id, UserId::new())).await.unwrap();

        let page = trail
            .query(
                business_id,
                &AuditFilter {
                    actor_id: Some(actor),
                    ..AuditFilter::default()
                },
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].actor_id, actor);
    }

    #[tokio::test]
    async fn test_query_pagination_has_more() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store);
        let business_id = BusinessId::new();
        let actor = UserId::new();

        for _ in 0..5 {
            trail.record(entry(business_id, actor)).await.unwrap();
        }

        let page = trail
            .query(
                business_id,
                &AuditFilter::default(),
                &PageRequest {
                    page: 1,
                    per_page: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total, 5);
        assert!(page.has_more);

        let last = trail
            .query(
                business_id,
                &AuditFilter::default(),
                &PageRequest {
                    page: 3,
                    per_page: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(last.entries.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_entity_trail_returns_full_history() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store);
        let business_id = BusinessId::new();
        let actor = UserId::new();
        let entity_id = Uuid::new_v4();

        for action in [AuditAction::CategoryCreated, AuditAction::CategoryUpdated] {
            trail
                .record(NewAuditEntry {
                    business_id,
                    action,
                    entity_type: AuditEntityType::Category,
                    entity_id,
                    changes: json!({}),
                    metadata: json!({}),
                    actor_id: actor,
                })
                .await
                .unwrap();
        }
        trail.record(entry(business_id, actor)).await.unwrap();

        let history = trail
            .entity_trail(business_id, AuditEntityType::Category, entity_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, AuditAction::CategoryUpdated);
        assert_eq!(history[1].action, AuditAction::CategoryCreated);
    }

    #[tokio::test]
    async fn test_recorded_entries_are_never_mutated() {
        let store = Arc::new(MemoryStore::new());
        let trail = AuditTrail::new(store);
        let business_id = BusinessId::new();

        let recorded = trail.record(entry(business_id, UserId::new())).await.unwrap();

        // Later writes leave earlier entries untouched.
        trail.record(entry(business_id, UserId::new())).await.unwrap();

        let page = trail
            .query(business_id, &AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        let found = page
            .entries
            .iter()
            .find(|e| e.id == recorded.id)
            .expect("entry still present");
        assert_eq!(*found, recorded);
    }
}
