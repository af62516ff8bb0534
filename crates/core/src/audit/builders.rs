//! Shape-builders for audit entries, one per domain action.
//!
//! Each constructor fills in the action, entity type, and change-set shape
//! for its action kind; none of them contain logic beyond that. Callers
//! pass the result straight to [`AuditTrail::record`](super::AuditTrail).

use patungan_shared::types::{
    AttachmentId, BusinessId, CategoryId, InviteId, MembershipId, TransactionId, UserId,
};
use serde_json::{json, Value};

use super::types::{AuditAction, AuditEntityType, NewAuditEntry};
use crate::ledger::types::{Settlement, TransactionRecord};
use crate::permission::Role;

impl NewAuditEntry {
    fn base(
        business_id: BusinessId,
        action: AuditAction,
        entity_type: AuditEntityType,
        entity_id: uuid::Uuid,
        actor_id: UserId,
    ) -> Self {
        Self {
            business_id,
            action,
            entity_type,
            entity_id,
            changes: json!({}),
            metadata: json!({}),
            actor_id,
        }
    }

    /// A business was created.
    #[must_use]
    pub fn business_created(business_id: BusinessId, name: &str, actor_id: UserId) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::BusinessCreated,
            AuditEntityType::Business,
            business_id.into_inner(),
            actor_id,
        );
        entry.changes = json!({ "after": { "name": name } });
        entry
    }

    /// Business profile or settings changed. `changes` carries the
    /// before/after map the caller computed.
    #[must_use]
    pub fn business_updated(business_id: BusinessId, changes: Value, actor_id: UserId) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::BusinessUpdated,
            AuditEntityType::Business,
            business_id.into_inner(),
            actor_id,
        );
        entry.changes = changes;
        entry
    }

    /// A business was archived.
    #[must_use]
    pub fn business_archived(business_id: BusinessId, actor_id: UserId) -> Self {
        Self::base(
            business_id,
            AuditAction::BusinessArchived,
            AuditEntityType::Business,
            business_id.into_inner(),
            actor_id,
        )
    }

    /// A member was invited.
    #[must_use]
    pub fn member_invited(
        business_id: BusinessId,
        invite_id: InviteId,
        email: &str,
        role: Role,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::MemberInvited,
            AuditEntityType::Invite,
            invite_id.into_inner(),
            actor_id,
        );
        entry.metadata = json!({ "email": email, "role": role.as_str() });
        entry
    }

    /// An invite was accepted, creating a membership.
    #[must_use]
    pub fn member_accepted(
        business_id: BusinessId,
        membership_id: MembershipId,
        role: Role,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::MemberAccepted,
            AuditEntityType::Membership,
            membership_id.into_inner(),
            actor_id,
        );
        entry.changes = json!({ "after": { "role": role.as_str() } });
        entry
    }

    /// A membership's role changed.
    #[must_use]
    pub fn member_role_changed(
        business_id: BusinessId,
        membership_id: MembershipId,
        old_role: Role,
        new_role: Role,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::MemberRoleChanged,
            AuditEntityType::Membership,
            membership_id.into_inner(),
            actor_id,
        );
        entry.changes = json!({
            "before": { "role": old_role.as_str() },
            "after": { "role": new_role.as_str() },
        });
        entry
    }

    /// A membership was deactivated.
    #[must_use]
    pub fn member_removed(
        business_id: BusinessId,
        membership_id: MembershipId,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::MemberRemoved,
            AuditEntityType::Membership,
            membership_id.into_inner(),
            actor_id,
        );
        entry.changes = json!({
            "before": { "is_active": true },
            "after": { "is_active": false },
        });
        entry
    }

    /// A pending invite was revoked.
    #[must_use]
    pub fn invite_revoked(business_id: BusinessId, invite_id: InviteId, actor_id: UserId) -> Self {
        Self::base(
            business_id,
            AuditAction::InviteRevoked,
            AuditEntityType::Invite,
            invite_id.into_inner(),
            actor_id,
        )
    }

    /// A category was created.
    #[must_use]
    pub fn category_created(
        business_id: BusinessId,
        category_id: CategoryId,
        name: &str,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::CategoryCreated,
            AuditEntityType::Category,
            category_id.into_inner(),
            actor_id,
        );
        entry.changes = json!({ "after": { "name": name } });
        entry
    }

    /// A category was updated.
    #[must_use]
    pub fn category_updated(
        business_id: BusinessId,
        category_id: CategoryId,
        changes: Value,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::CategoryUpdated,
            AuditEntityType::Category,
            category_id.into_inner(),
            actor_id,
        );
        entry.changes = changes;
        entry
    }

    /// An expense was recorded.
    #[must_use]
    pub fn expense_created(
        business_id: BusinessId,
        record: &TransactionRecord,
        actor_id: UserId,
    ) -> Self {
        Self::transaction_created(business_id, AuditAction::ExpenseCreated, record, actor_id)
    }

    /// An income was recorded.
    #[must_use]
    pub fn income_created(
        business_id: BusinessId,
        record: &TransactionRecord,
        actor_id: UserId,
    ) -> Self {
        Self::transaction_created(business_id, AuditAction::IncomeCreated, record, actor_id)
    }

    fn transaction_created(
        business_id: BusinessId,
        action: AuditAction,
        record: &TransactionRecord,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            action,
            AuditEntityType::Transaction,
            record.id.into_inner(),
            actor_id,
        );
        entry.changes = json!({
            "after": {
                "amount": record.amount,
                "attributed_to": record.attributed_to,
                "transaction_date": record.transaction_date,
            }
        });
        entry
    }

    /// An expense was edited.
    #[must_use]
    pub fn expense_updated(
        business_id: BusinessId,
        transaction_id: TransactionId,
        changes: Value,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::ExpenseUpdated,
            AuditEntityType::Transaction,
            transaction_id.into_inner(),
            actor_id,
        );
        entry.changes = changes;
        entry
    }

    /// An income was edited.
    #[must_use]
    pub fn income_updated(
        business_id: BusinessId,
        transaction_id: TransactionId,
        changes: Value,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::IncomeUpdated,
            AuditEntityType::Transaction,
            transaction_id.into_inner(),
            actor_id,
        );
        entry.changes = changes;
        entry
    }

    /// An expense was soft-deleted.
    #[must_use]
    pub fn expense_deleted(
        business_id: BusinessId,
        transaction_id: TransactionId,
        actor_id: UserId,
    ) -> Self {
        Self::base(
            business_id,
            AuditAction::ExpenseDeleted,
            AuditEntityType::Transaction,
            transaction_id.into_inner(),
            actor_id,
        )
    }

    /// An income was soft-deleted.
    #[must_use]
    pub fn income_deleted(
        business_id: BusinessId,
        transaction_id: TransactionId,
        actor_id: UserId,
    ) -> Self {
        Self::base(
            business_id,
            AuditAction::IncomeDeleted,
            AuditEntityType::Transaction,
            transaction_id.into_inner(),
            actor_id,
        )
    }

    /// A settlement was recorded. Settlements are immutable, so this is the
    /// only settlement action.
    #[must_use]
    pub fn settlement_created(settlement: &Settlement) -> Self {
        let mut entry = Self::base(
            settlement.business_id,
            AuditAction::SettlementCreated,
            AuditEntityType::Settlement,
            settlement.id.into_inner(),
            settlement.created_by,
        );
        entry.changes = json!({
            "after": {
                "membership_id": settlement.membership_id,
                "direction": settlement.direction.as_str(),
                "amount": settlement.amount,
                "settlement_date": settlement.settlement_date,
            }
        });
        entry
    }

    /// An attachment was added to a transaction.
    #[must_use]
    pub fn attachment_added(
        business_id: BusinessId,
        attachment_id: AttachmentId,
        transaction_id: TransactionId,
        file_name: &str,
        actor_id: UserId,
    ) -> Self {
        let mut entry = Self::base(
            business_id,
            AuditAction::AttachmentAdded,
            AuditEntityType::Attachment,
            attachment_id.into_inner(),
            actor_id,
        );
        entry.metadata = json!({
            "transaction_id": transaction_id,
            "file_name": file_name,
        });
        entry
    }

    /// An attachment was removed.
    #[must_use]
    pub fn attachment_removed(
        business_id: BusinessId,
        attachment_id: AttachmentId,
        actor_id: UserId,
    ) -> Self {
        Self::base(
            business_id,
            AuditAction::AttachmentRemoved,
            AuditEntityType::Attachment,
            attachment_id.into_inner(),
            actor_id,
        )
    }
}
