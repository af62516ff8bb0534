//! Ledger engine orchestrating balances and settlements.

use std::sync::Arc;

use chrono::Utc;
use patungan_shared::types::{BusinessId, MembershipId, SettlementId};
use rust_decimal::Decimal;

use super::balance::suggested_settlement;
use super::error::LedgerError;
use super::store::{BalanceSource, MembershipStore, SettlementStore, TransactionStore};
use super::types::{
    BalanceHistory, CreateSettlement, HistoryFilter, LedgerSummary, MemberBalance, MembershipInfo,
    Settlement, SettlementOutcome, SuggestedSettlement, TransactionKind,
};
use crate::audit::{AuditTrail, NewAuditEntry};

/// The ledger balance & settlement engine.
///
/// Balances are recomputed from source aggregates on every read; the engine
/// holds no state beyond its store handles.
#[derive(Clone)]
pub struct LedgerEngine {
    memberships: Arc<dyn MembershipStore>,
    balances: Arc<dyn BalanceSource>,
    transactions: Arc<dyn TransactionStore>,
    settlements: Arc<dyn SettlementStore>,
    audit: AuditTrail,
}

impl LedgerEngine {
    /// Creates a new engine over the injected stores.
    #[must_use]
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        balances: Arc<dyn BalanceSource>,
        transactions: Arc<dyn TransactionStore>,
        settlements: Arc<dyn SettlementStore>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            memberships,
            balances,
            transactions,
            settlements,
            audit,
        }
    }

    /// Computes a member's current balance from the full history.
    ///
    /// # Errors
    ///
    /// Returns `MembershipNotFound` if the membership does not belong to
    /// the business; store errors propagate.
    pub async fn member_balance(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<MemberBalance, LedgerError> {
        let membership = self.require_membership(business_id, membership_id).await?;
        self.balance_for(&membership).await
    }

    /// Computes the balance of every active membership and the business
    /// totals.
    pub async fn business_summary(
        &self,
        business_id: BusinessId,
    ) -> Result<LedgerSummary, LedgerError> {
        let memberships = self.memberships.active_memberships(business_id).await?;

        let mut balances = Vec::with_capacity(memberships.len());
        for membership in &memberships {
            balances.push(self.balance_for(membership).await?);
        }

        Ok(LedgerSummary::from_balances(balances))
    }

    /// The settlement that would zero a member's current balance, if any.
    ///
    /// Advisory only; nothing is created.
    pub async fn suggest_settlement(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<Option<SuggestedSettlement>, LedgerError> {
        let balance = self.member_balance(business_id, membership_id).await?;
        Ok(suggested_settlement(balance.balance))
    }

    /// Validates and records a settlement, audits it, and returns the
    /// freshly recomputed balance.
    ///
    /// Validation happens before any write. When `expected_balance` is set
    /// the live balance is re-checked immediately before the insert, so two
    /// callers cannot both settle the same balance. A settlement whose
    /// audit record failed to write is rolled back and the audit error
    /// propagated: the mutation is not durably completed without it.
    pub async fn create_settlement(
        &self,
        input: CreateSettlement,
    ) -> Result<SettlementOutcome, LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                amount: input.amount,
            });
        }

        let membership = self
            .require_membership(input.business_id, input.membership_id)
            .await?;

        if let Some(expected) = input.expected_balance {
            let current = self.balance_for(&membership).await?;
            if current.balance != expected {
                return Err(LedgerError::BalanceChanged {
                    expected,
                    actual: current.balance,
                });
            }
        }

        let settlement = Settlement {
            id: SettlementId::new(),
            business_id: input.business_id,
            membership_id: input.membership_id,
            direction: input.direction,
            amount: input.amount,
            note: input.note,
            settlement_date: input.settlement_date,
            created_by: input.created_by,
            created_at: Utc::now(),
        };

        self.settlements.insert_settlement(&settlement).await?;

        if let Err(audit_err) = self
            .audit
            .record(NewAuditEntry::settlement_created(&settlement))
            .await
        {
            // The settlement is not durable without its audit record.
            self.settlements.delete_settlement(settlement.id).await?;
            return Err(audit_err.into());
        }

        let new_balance = self.balance_for(&membership).await?;

        Ok(SettlementOutcome {
            settlement,
            new_balance,
        })
    }

    /// Windowed listing of everything affecting one member's balance.
    pub async fn balance_history(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        filter: &HistoryFilter,
    ) -> Result<BalanceHistory, LedgerError> {
        self.require_membership(business_id, membership_id).await?;

        let expenses = self
            .transactions
            .list_attributed(business_id, membership_id, TransactionKind::Expense, filter)
            .await?;
        let incomes = self
            .transactions
            .list_attributed(business_id, membership_id, TransactionKind::Income, filter)
            .await?;
        let settlements = self
            .settlements
            .list_settlements(business_id, membership_id, filter)
            .await?;

        Ok(BalanceHistory {
            expenses,
            incomes,
            settlements,
        })
    }

    async fn require_membership(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<MembershipInfo, LedgerError> {
        self.memberships
            .find_membership(business_id, membership_id)
            .await?
            .ok_or(LedgerError::MembershipNotFound {
                business_id,
                membership_id,
            })
    }

    async fn balance_for(&self, membership: &MembershipInfo) -> Result<MemberBalance, LedgerError> {
        let totals = self
            .balances
            .balance_totals(membership.business_id, membership.id)
            .await?;

        Ok(MemberBalance::from_totals(
            membership.id,
            membership.display_name.clone(),
            totals.paid_out_of_pocket,
            totals.received_personally,
            totals.settlements_received,
            totals.settlements_paid,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, AuditEntityType, AuditFilter};
    use crate::ledger::types::SettlementDirection;
    use crate::store::DateRange;
    use crate::testing::MemoryStore;
    use chrono::NaiveDate;
    use patungan_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        engine: LedgerEngine,
        business_id: BusinessId,
        membership_id: MembershipId,
        actor: UserId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let business_id = BusinessId::new();
        let membership_id = store.add_membership(business_id, "Ayu", true);
        let engine = LedgerEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            AuditTrail::new(store.clone()),
        );
        Fixture {
            store,
            engine,
            business_id,
            membership_id,
            actor: UserId::new(),
        }
    }

    fn settlement_input(fx: &Fixture, direction: SettlementDirection, amount: Decimal) -> CreateSettlement {
        CreateSettlement {
            business_id: fx.business_id,
            membership_id: fx.membership_id,
            direction,
            amount,
            note: None,
            settlement_date: date(2026, 3, 1),
            created_by: fx.actor,
            expected_balance: None,
        }
    }

    #[tokio::test]
    async fn test_balance_of_unknown_membership_is_not_found() {
        let fx = fixture();
        let result = fx
            .engine
            .member_balance(fx.business_id, MembershipId::new())
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::MembershipNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_balance_of_membership_in_other_business_is_not_found() {
        let fx = fixture();
        let result = fx
            .engine
            .member_balance(BusinessId::new(), fx.membership_id)
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::MembershipNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_out_of_pocket_expense_produces_positive_balance() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(100),
            date(2026, 1, 10),
        );

        let balance = fx
            .engine
            .member_balance(fx.business_id, fx.membership_id)
            .await
            .unwrap();
        assert_eq!(balance.balance, dec!(100));

        let suggestion = fx
            .engine
            .suggest_settlement(fx.business_id, fx.membership_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(suggestion.direction, SettlementDirection::BusinessToMember);
        assert_eq!(suggestion.amount, dec!(100));
    }

    #[tokio::test]
    async fn test_business_attributed_transactions_do_not_move_member_balance() {
        let fx = fixture();
        // Paid by the business itself: attribution is None.
        fx.store
            .add_expense(fx.business_id, None, dec!(500), date(2026, 1, 10));

        let balance = fx
            .engine
            .member_balance(fx.business_id, fx.membership_id)
            .await
            .unwrap();
        assert_eq!(balance.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_soft_deleted_transactions_are_excluded() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(100),
            date(2026, 1, 10),
        );
        let deleted = fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(40),
            date(2026, 1, 11),
        );
        fx.store.soft_delete_transaction(deleted);

        let balance = fx
            .engine
            .member_balance(fx.business_id, fx.membership_id)
            .await
            .unwrap();
        assert_eq!(balance.balance, dec!(100));
    }

    #[tokio::test]
    async fn test_settlement_round_trip_zeroes_balance() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(100),
            date(2026, 1, 10),
        );

        let outcome = fx
            .engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::BusinessToMember,
                dec!(100),
            ))
            .await
            .unwrap();

        assert_eq!(outcome.new_balance.balance, Decimal::ZERO);
        assert!(outcome.new_balance.suggested_settlement().is_none());
    }

    #[tokio::test]
    async fn test_repayment_round_trip_zeroes_balance() {
        let fx = fixture();
        fx.store.add_income(
            fx.business_id,
            Some(fx.membership_id),
            dec!(200),
            date(2026, 1, 12),
        );

        let balance = fx
            .engine
            .member_balance(fx.business_id, fx.membership_id)
            .await
            .unwrap();
        assert_eq!(balance.balance, dec!(-200));

        let outcome = fx
            .engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::MemberToBusiness,
                dec!(200),
            ))
            .await
            .unwrap();
        assert_eq!(outcome.new_balance.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_mixed_history_balance() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(150),
            date(2026, 1, 10),
        );
        fx.store.add_income(
            fx.business_id,
            Some(fx.membership_id),
            dec!(50),
            date(2026, 1, 11),
        );
        fx.engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::BusinessToMember,
                dec!(30),
            ))
            .await
            .unwrap();

        let balance = fx
            .engine
            .member_balance(fx.business_id, fx.membership_id)
            .await
            .unwrap();
        assert_eq!(balance.balance, dec!(70));
    }

    #[tokio::test]
    async fn test_create_settlement_rejects_zero_and_negative_amounts() {
        let fx = fixture();

        for amount in [dec!(0), dec!(-10)] {
            let result = fx
                .engine
                .create_settlement(settlement_input(
                    &fx,
                    SettlementDirection::BusinessToMember,
                    amount,
                ))
                .await;
            assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
        }

        // Nothing was written: no settlement, no audit entry.
        assert_eq!(fx.store.settlement_count(), 0);
        assert_eq!(fx.store.audit_count(), 0);
    }

    #[tokio::test]
    async fn test_create_settlement_rejects_unknown_membership() {
        let fx = fixture();
        let mut input = settlement_input(&fx, SettlementDirection::BusinessToMember, dec!(10));
        input.membership_id = MembershipId::new();

        let result = fx.engine.create_settlement(input).await;
        assert!(matches!(
            result,
            Err(LedgerError::MembershipNotFound { .. })
        ));
        assert_eq!(fx.store.settlement_count(), 0);
        assert_eq!(fx.store.audit_count(), 0);
    }

    #[tokio::test]
    async fn test_create_settlement_writes_audit_entry() {
        let fx = fixture();
        let outcome = fx
            .engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::BusinessToMember,
                dec!(25),
            ))
            .await
            .unwrap();

        let trail = AuditTrail::new(fx.store.clone());
        let entries = trail
            .entity_trail(
                fx.business_id,
                AuditEntityType::Settlement,
                outcome.settlement.id.into_inner(),
            )
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::SettlementCreated);
        assert_eq!(entries[0].actor_id, fx.actor);
    }

    #[tokio::test]
    async fn test_failed_audit_write_rolls_the_settlement_back() {
        let fx = fixture();
        fx.store.fail_next_audit_insert();

        let result = fx
            .engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::BusinessToMember,
                dec!(25),
            ))
            .await;

        assert!(matches!(result, Err(LedgerError::Audit(_))));
        assert_eq!(fx.store.settlement_count(), 0);
        assert_eq!(fx.store.audit_count(), 0);
    }

    #[tokio::test]
    async fn test_expected_balance_guard_detects_concurrent_settlement() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(100),
            date(2026, 1, 10),
        );

        // First caller settles the balance it read.
        let mut first = settlement_input(&fx, SettlementDirection::BusinessToMember, dec!(100));
        first.expected_balance = Some(dec!(100));
        fx.engine.create_settlement(first).await.unwrap();

        // Second caller read the same +100 balance before the first commit.
        let mut second = settlement_input(&fx, SettlementDirection::BusinessToMember, dec!(100));
        second.expected_balance = Some(dec!(100));
        let result = fx.engine.create_settlement(second).await;

        match result {
            Err(LedgerError::BalanceChanged { expected, actual }) => {
                assert_eq!(expected, dec!(100));
                assert_eq!(actual, Decimal::ZERO);
            }
            other => panic!("expected BalanceChanged, got {other:?}"),
        }
        assert_eq!(fx.store.settlement_count(), 1);
    }

    #[tokio::test]
    async fn test_business_summary_totals() {
        let fx = fixture();
        let other = fx.store.add_membership(fx.business_id, "Bima", true);
        let inactive = fx.store.add_membership(fx.business_id, "Citra", false);

        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(100),
            date(2026, 1, 10),
        );
        fx.store
            .add_income(fx.business_id, Some(other), dec!(40), date(2026, 1, 11));
        // Inactive member history is present but excluded from the summary.
        fx.store
            .add_expense(fx.business_id, Some(inactive), dec!(999), date(2026, 1, 12));

        let summary = fx.engine.business_summary(fx.business_id).await.unwrap();
        assert_eq!(summary.member_balances.len(), 2);
        assert_eq!(summary.total_owed_to_members, dec!(100));
        assert_eq!(summary.total_owed_by_members, dec!(40));
        assert_eq!(summary.net_balance, dec!(60));
    }

    #[tokio::test]
    async fn test_balance_history_is_windowed_and_filtered() {
        let fx = fixture();
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(10),
            date(2026, 1, 5),
        );
        fx.store.add_expense(
            fx.business_id,
            Some(fx.membership_id),
            dec!(20),
            date(2026, 2, 5),
        );
        fx.store.add_income(
            fx.business_id,
            Some(fx.membership_id),
            dec!(30),
            date(2026, 2, 6),
        );
        fx.engine
            .create_settlement(CreateSettlement {
                settlement_date: date(2026, 2, 7),
                ..settlement_input(&fx, SettlementDirection::BusinessToMember, dec!(5))
            })
            .await
            .unwrap();

        let filter = HistoryFilter {
            range: DateRange::between(date(2026, 2, 1), date(2026, 2, 28)),
            limit: Some(10),
        };
        let history = fx
            .engine
            .balance_history(fx.business_id, fx.membership_id, &filter)
            .await
            .unwrap();

        assert_eq!(history.expenses.len(), 1);
        assert_eq!(history.expenses[0].amount, dec!(20));
        assert_eq!(history.incomes.len(), 1);
        assert_eq!(history.settlements.len(), 1);
    }

    #[tokio::test]
    async fn test_balance_history_respects_limit() {
        let fx = fixture();
        for day in 1..=5 {
            fx.store.add_expense(
                fx.business_id,
                Some(fx.membership_id),
                dec!(1),
                date(2026, 1, day),
            );
        }

        let filter = HistoryFilter {
            range: DateRange::unbounded(),
            limit: Some(3),
        };
        let history = fx
            .engine
            .balance_history(fx.business_id, fx.membership_id, &filter)
            .await
            .unwrap();
        assert_eq!(history.expenses.len(), 3);
        // Newest first.
        assert_eq!(history.expenses[0].transaction_date, date(2026, 1, 5));
    }

    #[tokio::test]
    async fn test_audit_query_after_settlements() {
        let fx = fixture();
        fx.engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::BusinessToMember,
                dec!(10),
            ))
            .await
            .unwrap();
        fx.engine
            .create_settlement(settlement_input(
                &fx,
                SettlementDirection::MemberToBusiness,
                dec!(5),
            ))
            .await
            .unwrap();

        let trail = AuditTrail::new(fx.store.clone());
        let page = trail
            .query(
                fx.business_id,
                &AuditFilter {
                    action: Some(AuditAction::SettlementCreated),
                    ..AuditFilter::default()
                },
                &patungan_shared::types::PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
    }
}
