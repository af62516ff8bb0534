//! Named capabilities and the role default matrix.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// A named capability gating one kind of action.
///
/// The set is closed: every mutation and sensitive read in the system maps
/// to exactly one of these. Role assignment is deliberately NOT a
/// capability; it is governed by [`Role::can_assign`] alone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// View business profile and settings.
    ViewBusiness,
    /// Update business profile and settings.
    UpdateBusiness,
    /// Archive the business.
    ArchiveBusiness,
    /// View the member list.
    ViewMembers,
    /// Invite a new member.
    InviteMember,
    /// Deactivate a membership.
    RemoveMember,
    /// Revoke a pending invite.
    RevokeInvite,
    /// Record an expense.
    CreateExpense,
    /// Edit an expense.
    EditExpense,
    /// Soft-delete an expense.
    DeleteExpense,
    /// View expenses regardless of attribution.
    ViewAllExpenses,
    /// Record an income.
    CreateIncome,
    /// Edit an income.
    EditIncome,
    /// Soft-delete an income.
    DeleteIncome,
    /// View incomes regardless of attribution.
    ViewAllIncomes,
    /// Create a category.
    CreateCategory,
    /// Edit a category.
    EditCategory,
    /// Delete a category.
    DeleteCategory,
    /// View member balances and the business ledger summary.
    ViewLedger,
    /// Record a settlement.
    CreateSettlement,
    /// View the audit log.
    ViewAuditLog,
    /// View analytics rollups.
    ViewAnalytics,
    /// Attach a file to a transaction.
    AddAttachment,
    /// Remove an attachment.
    RemoveAttachment,
    /// View attachments.
    ViewAttachments,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::ViewBusiness,
        Self::UpdateBusiness,
        Self::ArchiveBusiness,
        Self::ViewMembers,
        Self::InviteMember,
        Self::RemoveMember,
        Self::RevokeInvite,
        Self::CreateExpense,
        Self::EditExpense,
        Self::DeleteExpense,
        Self::ViewAllExpenses,
        Self::CreateIncome,
        Self::EditIncome,
        Self::DeleteIncome,
        Self::ViewAllIncomes,
        Self::CreateCategory,
        Self::EditCategory,
        Self::DeleteCategory,
        Self::ViewLedger,
        Self::CreateSettlement,
        Self::ViewAuditLog,
        Self::ViewAnalytics,
        Self::AddAttachment,
        Self::RemoveAttachment,
        Self::ViewAttachments,
    ];

    /// Returns the kebab-case name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewBusiness => "view-business",
            Self::UpdateBusiness => "update-business",
            Self::ArchiveBusiness => "archive-business",
            Self::ViewMembers => "view-members",
            Self::InviteMember => "invite-member",
            Self::RemoveMember => "remove-member",
            Self::RevokeInvite => "revoke-invite",
            Self::CreateExpense => "create-expense",
            Self::EditExpense => "edit-expense",
            Self::DeleteExpense => "delete-expense",
            Self::ViewAllExpenses => "view-all-expenses",
            Self::CreateIncome => "create-income",
            Self::EditIncome => "edit-income",
            Self::DeleteIncome => "delete-income",
            Self::ViewAllIncomes => "view-all-incomes",
            Self::CreateCategory => "create-category",
            Self::EditCategory => "edit-category",
            Self::DeleteCategory => "delete-category",
            Self::ViewLedger => "view-ledger",
            Self::CreateSettlement => "create-settlement",
            Self::ViewAuditLog => "view-audit-log",
            Self::ViewAnalytics => "view-analytics",
            Self::AddAttachment => "add-attachment",
            Self::RemoveAttachment => "remove-attachment",
            Self::ViewAttachments => "view-attachments",
        }
    }

    /// Parse a capability from its kebab-case name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Default grant for `role`, straight from the capability matrix.
    ///
    /// The matrix is a total function: the exhaustive match below defines a
    /// value for every role x capability pair, checked at compile time.
    #[must_use]
    pub const fn default_grant(self, role: Role) -> bool {
        match role {
            // Owner holds every capability.
            Role::Owner => true,

            // Co-owner holds everything but archiving the business.
            Role::CoOwner => !matches!(self, Self::ArchiveBusiness),

            // Admin manages members, transactions, and configuration, but
            // cannot change or archive the business itself.
            Role::Admin => !matches!(self, Self::UpdateBusiness | Self::ArchiveBusiness),

            Role::Accountant => match self {
                Self::ViewBusiness
                | Self::ViewMembers
                | Self::CreateExpense
                | Self::EditExpense
                | Self::DeleteExpense
                | Self::ViewAllExpenses
                | Self::CreateIncome
                | Self::EditIncome
                | Self::DeleteIncome
                | Self::ViewAllIncomes
                | Self::CreateCategory
                | Self::EditCategory
                | Self::ViewLedger
                | Self::CreateSettlement
                | Self::ViewAuditLog
                | Self::ViewAnalytics
                | Self::AddAttachment
                | Self::RemoveAttachment
                | Self::ViewAttachments => true,
                Self::UpdateBusiness
                | Self::ArchiveBusiness
                | Self::InviteMember
                | Self::RemoveMember
                | Self::RevokeInvite
                | Self::DeleteCategory => false,
            },

            Role::Employee => match self {
                Self::ViewBusiness
                | Self::ViewMembers
                | Self::CreateExpense
                | Self::CreateIncome
                | Self::AddAttachment
                | Self::ViewAttachments => true,
                Self::UpdateBusiness
                | Self::ArchiveBusiness
                | Self::InviteMember
                | Self::RemoveMember
                | Self::RevokeInvite
                | Self::EditExpense
                | Self::DeleteExpense
                | Self::ViewAllExpenses
                | Self::EditIncome
                | Self::DeleteIncome
                | Self::ViewAllIncomes
                | Self::CreateCategory
                | Self::EditCategory
                | Self::DeleteCategory
                | Self::ViewLedger
                | Self::CreateSettlement
                | Self::ViewAuditLog
                | Self::ViewAnalytics
                | Self::RemoveAttachment => false,
            },
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
