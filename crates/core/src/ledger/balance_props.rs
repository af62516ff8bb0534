//! Property-based tests for balance arithmetic and settlement suggestions.

use patungan_shared::types::MembershipId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::suggested_settlement;
use super::types::{LedgerSummary, MemberBalance, SettlementDirection};

/// Strategy for non-negative monetary magnitudes (two decimal places).
fn magnitude() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for signed balances.
fn signed_balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn balance_from(
    paid: Decimal,
    received: Decimal,
    settled_in: Decimal,
    settled_out: Decimal,
) -> MemberBalance {
    MemberBalance::from_totals(
        MembershipId::new(),
        "Member".to_string(),
        paid,
        received,
        settled_in,
        settled_out,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The signed formula holds for any combination of aggregates.
    #[test]
    fn prop_balance_formula(
        paid in magnitude(),
        received in magnitude(),
        settled_in in magnitude(),
        settled_out in magnitude(),
    ) {
        let balance = balance_from(paid, received, settled_in, settled_out);
        prop_assert_eq!(
            balance.balance,
            paid - received - settled_in + settled_out
        );
    }

    /// A suggestion exists exactly when the balance is non-zero, matches the
    /// sign, and carries the absolute magnitude.
    #[test]
    fn prop_suggestion_matches_sign_and_magnitude(balance in signed_balance()) {
        match suggested_settlement(balance) {
            None => prop_assert!(balance.is_zero()),
            Some(suggestion) => {
                prop_assert!(!balance.is_zero());
                prop_assert_eq!(suggestion.amount, balance.abs());
                let expected = if balance > Decimal::ZERO {
                    SettlementDirection::BusinessToMember
                } else {
                    SettlementDirection::MemberToBusiness
                };
                prop_assert_eq!(suggestion.direction, expected);
            }
        }
    }

    /// Applying the suggested settlement zeroes the balance.
    #[test]
    fn prop_suggested_settlement_zeroes_the_balance(
        paid in magnitude(),
        received in magnitude(),
        settled_in in magnitude(),
        settled_out in magnitude(),
    ) {
        let before = balance_from(paid, received, settled_in, settled_out);
        let Some(suggestion) = suggested_settlement(before.balance) else {
            prop_assert!(before.balance.is_zero());
            return Ok(());
        };

        let after = match suggestion.direction {
            SettlementDirection::BusinessToMember => balance_from(
                paid,
                received,
                settled_in + suggestion.amount,
                settled_out,
            ),
            SettlementDirection::MemberToBusiness => balance_from(
                paid,
                received,
                settled_in,
                settled_out + suggestion.amount,
            ),
        };
        prop_assert!(after.balance.is_zero());
    }

    /// Summary totals partition the balances: positives into owed-to,
    /// absolute negatives into owed-by, and the net is their difference.
    #[test]
    fn prop_summary_partitions_balances(
        balances in prop::collection::vec(signed_balance(), 0..12),
    ) {
        let members: Vec<MemberBalance> = balances
            .iter()
            .map(|b| balance_from((*b).max(Decimal::ZERO), (-*b).max(Decimal::ZERO), Decimal::ZERO, Decimal::ZERO))
            .collect();
        let summary = LedgerSummary::from_balances(members);

        let expected_to: Decimal = balances
            .iter()
            .filter(|b| **b > Decimal::ZERO)
            .copied()
            .sum();
        let expected_by: Decimal = balances
            .iter()
            .filter(|b| **b < Decimal::ZERO)
            .map(|b| b.abs())
            .sum();

        prop_assert_eq!(summary.total_owed_to_members, expected_to);
        prop_assert_eq!(summary.total_owed_by_members, expected_by);
        prop_assert_eq!(summary.net_balance, expected_to - expected_by);
    }
}
