//! Ledger domain types.

use chrono::{DateTime, NaiveDate, Utc};
use patungan_shared::types::{
    BusinessId, CategoryId, MembershipId, SettlementId, TransactionId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::permission::Role;
use crate::store::DateRange;

/// Transaction kind: money out or money in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent by the business or a member.
    Expense,
    /// Money received by the business or a member.
    Income,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

/// Which party a settlement moves money towards.
///
/// The amount is always a positive magnitude; direction alone encodes who
/// is being paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementDirection {
    /// The business pays the member (reimbursement).
    BusinessToMember,
    /// The member pays the business (repayment).
    MemberToBusiness,
}

impl SettlementDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusinessToMember => "business_to_member",
            Self::MemberToBusiness => "member_to_business",
        }
    }

    /// Parse a direction from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business_to_member" => Some(Self::BusinessToMember),
            "member_to_business" => Some(Self::MemberToBusiness),
            _ => None,
        }
    }
}

impl std::fmt::Display for SettlementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership identity as the membership store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipInfo {
    /// The membership ID.
    pub id: MembershipId,
    /// The business this membership belongs to.
    pub business_id: BusinessId,
    /// The user behind the membership.
    pub user_id: UserId,
    /// The member's role.
    pub role: Role,
    /// Whether the membership is active (deactivated memberships are kept,
    /// never hard-deleted).
    pub is_active: bool,
    /// Display name for summaries and histories.
    pub display_name: String,
}

/// A member's derived balance against the business.
///
/// Positive = the business owes the member. Negative = the member owes the
/// business. Zero = even.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    /// The membership this balance belongs to.
    pub membership_id: MembershipId,
    /// Display name of the member.
    pub display_name: String,
    /// Total non-deleted expenses the member paid out-of-pocket.
    pub paid_out_of_pocket: Decimal,
    /// Total non-deleted incomes the member received personally.
    pub received_personally: Decimal,
    /// Total settlements the business paid to the member.
    pub settlements_received: Decimal,
    /// Total settlements the member paid to the business.
    pub settlements_paid: Decimal,
    /// The signed net balance.
    pub balance: Decimal,
}

/// Business-wide balance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Balance of every active membership.
    pub member_balances: Vec<MemberBalance>,
    /// Sum of strictly positive balances.
    pub total_owed_to_members: Decimal,
    /// Sum of the absolute values of strictly negative balances.
    pub total_owed_by_members: Decimal,
    /// `total_owed_to_members - total_owed_by_members`.
    pub net_balance: Decimal,
}

/// An advisory settlement that would zero a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedSettlement {
    /// Which party pays.
    pub direction: SettlementDirection,
    /// The positive magnitude to settle.
    pub amount: Decimal,
}

/// A recorded settlement. Immutable once created; balances are offset by
/// recording further settlements, never by editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The settlement ID.
    pub id: SettlementId,
    /// The business the settlement belongs to.
    pub business_id: BusinessId,
    /// The member being settled with.
    pub membership_id: MembershipId,
    /// Which party pays.
    pub direction: SettlementDirection,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Optional free-form note.
    pub note: Option<String>,
    /// The date the settlement applies to.
    pub settlement_date: NaiveDate,
    /// The user who recorded the settlement.
    pub created_by: UserId,
    /// When the settlement was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a settlement.
#[derive(Debug, Clone)]
pub struct CreateSettlement {
    /// The business the settlement belongs to.
    pub business_id: BusinessId,
    /// The member being settled with.
    pub membership_id: MembershipId,
    /// Which party pays.
    pub direction: SettlementDirection,
    /// Must be strictly positive.
    pub amount: Decimal,
    /// Optional free-form note.
    pub note: Option<String>,
    /// The date the settlement applies to.
    pub settlement_date: NaiveDate,
    /// The acting user.
    pub created_by: UserId,
    /// Optimistic concurrency guard: when set, the member's balance is
    /// re-read immediately before the insert and the creation fails if it
    /// no longer matches. Protects against two callers settling the same
    /// balance concurrently.
    pub expected_balance: Option<Decimal>,
}

/// Result of a successful settlement creation.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// The persisted settlement.
    pub settlement: Settlement,
    /// The member's balance recomputed after the settlement.
    pub new_balance: MemberBalance,
}

/// A single expense or income as the transaction store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The transaction ID.
    pub id: TransactionId,
    /// Expense or income.
    pub kind: TransactionKind,
    /// Non-negative magnitude.
    pub amount: Decimal,
    /// Category, if assigned.
    pub category_id: Option<CategoryId>,
    /// The member who paid/received personally, or `None` for the business
    /// itself.
    pub attributed_to: Option<MembershipId>,
    /// Optional free-form note.
    pub note: Option<String>,
    /// The transaction date.
    pub transaction_date: NaiveDate,
}

/// Window filter for balance history listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    /// Optional inclusive date range.
    pub range: DateRange,
    /// Maximum entries per listing.
    pub limit: Option<u64>,
}

/// Windowed history of everything affecting one member's balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceHistory {
    /// The member's non-deleted out-of-pocket expenses.
    pub expenses: Vec<TransactionRecord>,
    /// The member's non-deleted personally received incomes.
    pub incomes: Vec<TransactionRecord>,
    /// Settlements involving the member, both directions.
    pub settlements: Vec<Settlement>,
}
