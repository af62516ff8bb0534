//! Audit trail domain types.

use chrono::{DateTime, Utc};
use patungan_shared::types::{AuditLogId, BusinessId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::DateRange;

/// The closed set of auditable domain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A business was created.
    BusinessCreated,
    /// Business profile or settings changed.
    BusinessUpdated,
    /// A business was archived.
    BusinessArchived,
    /// A member was invited.
    MemberInvited,
    /// An invite was accepted, creating a membership.
    MemberAccepted,
    /// A membership's role changed.
    MemberRoleChanged,
    /// A membership was deactivated.
    MemberRemoved,
    /// A pending invite was revoked.
    InviteRevoked,
    /// A category was created.
    CategoryCreated,
    /// A category was updated.
    CategoryUpdated,
    /// An expense was recorded.
    ExpenseCreated,
    /// An expense was edited.
    ExpenseUpdated,
    /// An expense was soft-deleted.
    ExpenseDeleted,
    /// An income was recorded.
    IncomeCreated,
    /// An income was edited.
    IncomeUpdated,
    /// An income was soft-deleted.
    IncomeDeleted,
    /// A settlement was recorded.
    SettlementCreated,
    /// An attachment was added to a transaction.
    AttachmentAdded,
    /// An attachment was removed.
    AttachmentRemoved,
}

impl AuditAction {
    /// Returns the snake_case name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusinessCreated => "business_created",
            Self::BusinessUpdated => "business_updated",
            Self::BusinessArchived => "business_archived",
            Self::MemberInvited => "member_invited",
            Self::MemberAccepted => "member_accepted",
            Self::MemberRoleChanged => "member_role_changed",
            Self::MemberRemoved => "member_removed",
            Self::InviteRevoked => "invite_revoked",
            Self::CategoryCreated => "category_created",
            Self::CategoryUpdated => "category_updated",
            Self::ExpenseCreated => "expense_created",
            Self::ExpenseUpdated => "expense_updated",
            Self::ExpenseDeleted => "expense_deleted",
            Self::IncomeCreated => "income_created",
            Self::IncomeUpdated => "income_updated",
            Self::IncomeDeleted => "income_deleted",
            Self::SettlementCreated => "settlement_created",
            Self::AttachmentAdded => "attachment_added",
            Self::AttachmentRemoved => "attachment_removed",
        }
    }

    /// Parse an action from its snake_case name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        const ALL: [AuditAction; 19] = [
            AuditAction::BusinessCreated,
            AuditAction::BusinessUpdated,
            AuditAction::BusinessArchived,
            AuditAction::MemberInvited,
            AuditAction::MemberAccepted,
            AuditAction::MemberRoleChanged,
            AuditAction::MemberRemoved,
            AuditAction::InviteRevoked,
            AuditAction::CategoryCreated,
            AuditAction::CategoryUpdated,
            AuditAction::ExpenseCreated,
            AuditAction::ExpenseUpdated,
            AuditAction::ExpenseDeleted,
            AuditAction::IncomeCreated,
            AuditAction::IncomeUpdated,
            AuditAction::IncomeDeleted,
            AuditAction::SettlementCreated,
            AuditAction::AttachmentAdded,
            AuditAction::AttachmentRemoved,
        ];
        ALL.into_iter().find(|a| a.as_str() == s)
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of entity an audit entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    /// The business itself.
    Business,
    /// A membership.
    Membership,
    /// A pending invite.
    Invite,
    /// A transaction category.
    Category,
    /// An expense or income.
    Transaction,
    /// A settlement.
    Settlement,
    /// A transaction attachment.
    Attachment,
}

impl AuditEntityType {
    /// Returns the snake_case name of the entity type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Membership => "membership",
            Self::Invite => "invite",
            Self::Category => "category",
            Self::Transaction => "transaction",
            Self::Settlement => "settlement",
            Self::Attachment => "attachment",
        }
    }

    /// Parse an entity type from its snake_case name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        const ALL: [AuditEntityType; 7] = [
            AuditEntityType::Business,
            AuditEntityType::Membership,
            AuditEntityType::Invite,
            AuditEntityType::Category,
            AuditEntityType::Transaction,
            AuditEntityType::Settlement,
            AuditEntityType::Attachment,
        ];
        ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// The entry ID.
    pub id: AuditLogId,
    /// The business the action happened in.
    pub business_id: BusinessId,
    /// What happened.
    pub action: AuditAction,
    /// The kind of entity acted on.
    pub entity_type: AuditEntityType,
    /// The entity acted on.
    pub entity_id: Uuid,
    /// Before/after change map (shape varies per action).
    pub changes: serde_json::Value,
    /// Free-form metadata.
    pub metadata: serde_json::Value,
    /// The user who performed the action.
    pub actor_id: UserId,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input shape for recording an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    /// The business the action happened in.
    pub business_id: BusinessId,
    /// What happened.
    pub action: AuditAction,
    /// The kind of entity acted on.
    pub entity_type: AuditEntityType,
    /// The entity acted on.
    pub entity_id: Uuid,
    /// Before/after change map.
    pub changes: serde_json::Value,
    /// Free-form metadata.
    pub metadata: serde_json::Value,
    /// The user who performed the action.
    pub actor_id: UserId,
}

/// Filters for audit queries. All fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to one action kind.
    pub action: Option<AuditAction>,
    /// Restrict to one entity type.
    pub entity_type: Option<AuditEntityType>,
    /// Restrict to one entity.
    pub entity_id: Option<Uuid>,
    /// Restrict to one actor.
    pub actor_id: Option<UserId>,
    /// Restrict to a created-at date range.
    pub range: DateRange,
}

/// One page of audit entries, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPage {
    /// The entries in this page.
    pub entries: Vec<AuditLogEntry>,
    /// Total entries matching the filter.
    pub total: u64,
    /// Whether further pages exist.
    pub has_more: bool,
}
