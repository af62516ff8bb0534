//! Postgres enum mappings and conversions to the core domain enums.

use patungan_core::ledger::{SettlementDirection as CoreDirection, TransactionKind as CoreKind};
use patungan_core::permission::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member role stored in the `member_role` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "member_role")]
pub enum MemberRole {
    /// Full access including ownership transfer.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Full access except archiving the business.
    #[sea_orm(string_value = "co-owner")]
    CoOwner,
    /// Manages members and configuration.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Keeps the books.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Day-to-day participant.
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl From<MemberRole> for Role {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Owner => Self::Owner,
            MemberRole::CoOwner => Self::CoOwner,
            MemberRole::Admin => Self::Admin,
            MemberRole::Accountant => Self::Accountant,
            MemberRole::Employee => Self::Employee,
        }
    }
}

impl From<Role> for MemberRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Owner => Self::Owner,
            Role::CoOwner => Self::CoOwner,
            Role::Admin => Self::Admin,
            Role::Accountant => Self::Accountant,
            Role::Employee => Self::Employee,
        }
    }
}

/// Transaction kind stored in the `transaction_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Money spent.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money received.
    #[sea_orm(string_value = "income")]
    Income,
}

impl From<TransactionKind> for CoreKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => Self::Expense,
            TransactionKind::Income => Self::Income,
        }
    }
}

impl From<CoreKind> for TransactionKind {
    fn from(kind: CoreKind) -> Self {
        match kind {
            CoreKind::Expense => Self::Expense,
            CoreKind::Income => Self::Income,
        }
    }
}

/// Settlement direction stored in the `settlement_direction` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_direction")]
pub enum SettlementDirection {
    /// The business pays the member.
    #[sea_orm(string_value = "business_to_member")]
    BusinessToMember,
    /// The member pays the business.
    #[sea_orm(string_value = "member_to_business")]
    MemberToBusiness,
}

impl From<SettlementDirection> for CoreDirection {
    fn from(direction: SettlementDirection) -> Self {
        match direction {
            SettlementDirection::BusinessToMember => Self::BusinessToMember,
            SettlementDirection::MemberToBusiness => Self::MemberToBusiness,
        }
    }
}

impl From<CoreDirection> for SettlementDirection {
    fn from(direction: CoreDirection) -> Self {
        match direction {
            CoreDirection::BusinessToMember => Self::BusinessToMember,
            CoreDirection::MemberToBusiness => Self::MemberToBusiness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from(MemberRole::from(role)), role);
        }
    }

    #[test]
    fn test_transaction_kind_round_trip() {
        for kind in [CoreKind::Expense, CoreKind::Income] {
            assert_eq!(CoreKind::from(TransactionKind::from(kind)), kind);
        }
    }

    #[test]
    fn test_settlement_direction_round_trip() {
        for direction in [CoreDirection::BusinessToMember, CoreDirection::MemberToBusiness] {
            assert_eq!(CoreDirection::from(SettlementDirection::from(direction)), direction);
        }
    }
}
