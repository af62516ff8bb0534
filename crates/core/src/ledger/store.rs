//! Store traits for the ledger's persistence boundary.
//!
//! Each trait is an injected repository interface; the db crate provides
//! the PostgreSQL implementations and the tests run against in-memory
//! fakes.

use async_trait::async_trait;
use patungan_shared::types::{BusinessId, MembershipId, SettlementId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{HistoryFilter, MembershipInfo, Settlement, TransactionKind, TransactionRecord};
use crate::store::StoreError;

/// Membership lookup boundary.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Finds a membership by (business, membership) pairing.
    ///
    /// Returns `None` when the membership does not exist or belongs to a
    /// different business.
    async fn find_membership(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<Option<MembershipInfo>, StoreError>;

    /// Lists the active memberships of a business.
    async fn active_memberships(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<MembershipInfo>, StoreError>;
}

/// The four aggregates a member balance derives from.
///
/// Expense and income sums cover non-deleted transactions attributed to the
/// member; settlement sums are split by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Sum of non-deleted expenses the member paid out-of-pocket.
    pub paid_out_of_pocket: Decimal,
    /// Sum of non-deleted incomes the member received personally.
    pub received_personally: Decimal,
    /// Sum of business-to-member settlements.
    pub settlements_received: Decimal,
    /// Sum of member-to-business settlements.
    pub settlements_paid: Decimal,
}

/// Balance aggregate boundary.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Reads the four balance aggregates for one member.
    ///
    /// Implementations must serve all four sums from a single consistent
    /// snapshot (one read transaction), so a balance never mixes pre- and
    /// post-commit data from concurrent writers.
    async fn balance_totals(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<BalanceTotals, StoreError>;
}

/// Expense/income listing boundary.
///
/// All queries exclude soft-deleted transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Windowed listing of transactions of `kind` attributed to
    /// `membership_id`, newest first.
    async fn list_attributed(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        kind: TransactionKind,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError>;
}

/// Settlement boundary.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Windowed listing of a member's settlements, both directions, newest
    /// first.
    async fn list_settlements(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        filter: &HistoryFilter,
    ) -> Result<Vec<Settlement>, StoreError>;

    /// Persists a new settlement.
    async fn insert_settlement(&self, settlement: &Settlement) -> Result<(), StoreError>;

    /// Removes a settlement.
    ///
    /// This exists solely as the compensating rollback path for a failed
    /// audit write. Settlements have no other mutation surface.
    async fn delete_settlement(&self, id: SettlementId) -> Result<(), StoreError>;
}
