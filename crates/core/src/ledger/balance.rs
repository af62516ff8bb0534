//! Signed balance arithmetic.
//!
//! The sign convention across the whole system:
//!
//! ```text
//! balance = paid_out_of_pocket - received_personally
//!           - settlements_received + settlements_paid
//! ```
//!
//! Positive means the business owes the member; negative means the member
//! owes the business.

use patungan_shared::types::MembershipId;
use rust_decimal::Decimal;

use super::types::{LedgerSummary, MemberBalance, SettlementDirection, SuggestedSettlement};

impl MemberBalance {
    /// Combines the four source aggregates with the signed formula.
    #[must_use]
    pub fn from_totals(
        membership_id: MembershipId,
        display_name: String,
        paid_out_of_pocket: Decimal,
        received_personally: Decimal,
        settlements_received: Decimal,
        settlements_paid: Decimal,
    ) -> Self {
        let balance =
            paid_out_of_pocket - received_personally - settlements_received + settlements_paid;
        Self {
            membership_id,
            display_name,
            paid_out_of_pocket,
            received_personally,
            settlements_received,
            settlements_paid,
            balance,
        }
    }

    /// The settlement that would zero this balance, if any.
    #[must_use]
    pub fn suggested_settlement(&self) -> Option<SuggestedSettlement> {
        suggested_settlement(self.balance)
    }
}

/// Proposes the settlement that would zero `balance`.
///
/// Returns `None` exactly when the balance is already zero. Advisory only:
/// nothing is created.
#[must_use]
pub fn suggested_settlement(balance: Decimal) -> Option<SuggestedSettlement> {
    if balance.is_zero() {
        return None;
    }

    let direction = if balance > Decimal::ZERO {
        SettlementDirection::BusinessToMember
    } else {
        SettlementDirection::MemberToBusiness
    };

    Some(SuggestedSettlement {
        direction,
        amount: balance.abs(),
    })
}

impl LedgerSummary {
    /// Builds the business-wide summary from per-member balances.
    ///
    /// Strictly positive balances accumulate into `total_owed_to_members`;
    /// the absolute values of strictly negative balances accumulate into
    /// `total_owed_by_members`. Zero balances touch neither total.
    #[must_use]
    pub fn from_balances(member_balances: Vec<MemberBalance>) -> Self {
        let mut total_owed_to_members = Decimal::ZERO;
        let mut total_owed_by_members = Decimal::ZERO;

        for member in &member_balances {
            if member.balance > Decimal::ZERO {
                total_owed_to_members += member.balance;
            } else if member.balance < Decimal::ZERO {
                total_owed_by_members += member.balance.abs();
            }
        }

        Self {
            member_balances,
            total_owed_to_members,
            total_owed_by_members,
            net_balance: total_owed_to_members - total_owed_by_members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balance_of(
        paid: Decimal,
        received: Decimal,
        settled_to_member: Decimal,
        settled_to_business: Decimal,
    ) -> MemberBalance {
        MemberBalance::from_totals(
            MembershipId::new(),
            "Member".to_string(),
            paid,
            received,
            settled_to_member,
            settled_to_business,
        )
    }

    #[test]
    fn test_out_of_pocket_expense_is_owed_back() {
        // Member pays a $100 expense out-of-pocket, no settlements yet.
        let balance = balance_of(dec!(100), dec!(0), dec!(0), dec!(0));
        assert_eq!(balance.balance, dec!(100));

        let suggestion = balance.suggested_settlement().unwrap();
        assert_eq!(suggestion.direction, SettlementDirection::BusinessToMember);
        assert_eq!(suggestion.amount, dec!(100));
    }

    #[test]
    fn test_reimbursement_returns_balance_to_zero() {
        // Business reimburses the $100.
        let balance = balance_of(dec!(100), dec!(0), dec!(100), dec!(0));
        assert_eq!(balance.balance, dec!(0));
        assert!(balance.suggested_settlement().is_none());
    }

    #[test]
    fn test_personally_received_income_is_owed_to_business() {
        // Member personally receives $200 of business income.
        let balance = balance_of(dec!(0), dec!(200), dec!(0), dec!(0));
        assert_eq!(balance.balance, dec!(-200));

        let suggestion = balance.suggested_settlement().unwrap();
        assert_eq!(suggestion.direction, SettlementDirection::MemberToBusiness);
        assert_eq!(suggestion.amount, dec!(200));
    }

    #[test]
    fn test_repayment_returns_balance_to_zero() {
        // Member repays the $200.
        let balance = balance_of(dec!(0), dec!(200), dec!(0), dec!(200));
        assert_eq!(balance.balance, dec!(0));
        assert!(balance.suggested_settlement().is_none());
    }

    #[test]
    fn test_mixed_history() {
        // $150 paid out-of-pocket, $50 received personally, $30 reimbursed.
        let balance = balance_of(dec!(150), dec!(50), dec!(30), dec!(0));
        assert_eq!(balance.balance, dec!(70));
    }

    #[test]
    fn test_suggested_settlement_none_iff_zero() {
        assert!(suggested_settlement(Decimal::ZERO).is_none());
        assert!(suggested_settlement(dec!(0.01)).is_some());
        assert!(suggested_settlement(dec!(-0.01)).is_some());
    }

    #[test]
    fn test_summary_totals() {
        let balances = vec![
            balance_of(dec!(100), dec!(0), dec!(0), dec!(0)), // +100
            balance_of(dec!(0), dec!(40), dec!(0), dec!(0)),  // -40
            balance_of(dec!(25), dec!(25), dec!(0), dec!(0)), // 0
        ];
        let summary = LedgerSummary::from_balances(balances);

        assert_eq!(summary.total_owed_to_members, dec!(100));
        assert_eq!(summary.total_owed_by_members, dec!(40));
        assert_eq!(summary.net_balance, dec!(60));
        assert_eq!(summary.member_balances.len(), 3);
    }

    #[test]
    fn test_summary_of_no_members() {
        let summary = LedgerSummary::from_balances(vec![]);
        assert_eq!(summary.total_owed_to_members, Decimal::ZERO);
        assert_eq!(summary.total_owed_by_members, Decimal::ZERO);
        assert_eq!(summary.net_balance, Decimal::ZERO);
    }
}
