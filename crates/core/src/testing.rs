//! In-memory store fakes for tests.
//!
//! `MemoryStore` implements every store trait in the crate so engine,
//! trail, and aggregator tests run without a database. State lives behind
//! plain mutexes; ordering guarantees mirror what the SQL implementations
//! provide (newest first for listings, ascending buckets for series).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use patungan_shared::types::{
    BusinessId, CategoryId, MembershipId, SettlementId, TransactionId, UserId,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::analytics::{
    AnalyticsStore, AttributionTotal, CategoryTotal, PeriodTotal, TimeGranularity,
    TransactionTotals,
};
use crate::audit::{AuditEntityType, AuditFilter, AuditLogEntry, AuditStore};
use crate::ledger::{
    BalanceSource, BalanceTotals, HistoryFilter, MembershipInfo, MembershipStore, Settlement,
    SettlementDirection, SettlementStore, TransactionKind, TransactionRecord, TransactionStore,
};
use crate::permission::Role;
use crate::store::{DateRange, StoreError};

struct StoredTransaction {
    business_id: BusinessId,
    record: TransactionRecord,
    deleted: bool,
}

/// In-memory implementation of every store boundary.
pub(crate) struct MemoryStore {
    memberships: Mutex<Vec<MembershipInfo>>,
    transactions: Mutex<Vec<StoredTransaction>>,
    settlements: Mutex<Vec<Settlement>>,
    audit: Mutex<Vec<AuditLogEntry>>,
    fail_next_audit: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            memberships: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
            settlements: Mutex::new(Vec::new()),
            audit: Mutex::new(Vec::new()),
            fail_next_audit: AtomicBool::new(false),
        }
    }

    pub fn add_membership(
        &self,
        business_id: BusinessId,
        display_name: &str,
        is_active: bool,
    ) -> MembershipId {
        let id = MembershipId::new();
        self.memberships.lock().unwrap().push(MembershipInfo {
            id,
            business_id,
            user_id: UserId::new(),
            role: Role::Employee,
            is_active,
            display_name: display_name.to_string(),
        });
        id
    }

    fn add_transaction(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        attributed_to: Option<MembershipId>,
        category_id: Option<CategoryId>,
        amount: Decimal,
        transaction_date: NaiveDate,
    ) -> TransactionId {
        let id = TransactionId::new();
        self.transactions.lock().unwrap().push(StoredTransaction {
            business_id,
            record: TransactionRecord {
                id,
                kind,
                amount,
                category_id,
                attributed_to,
                note: None,
                transaction_date,
            },
            deleted: false,
        });
        id
    }

    pub fn add_expense(
        &self,
        business_id: BusinessId,
        attributed_to: Option<MembershipId>,
        amount: Decimal,
        transaction_date: NaiveDate,
    ) -> TransactionId {
        self.add_transaction(
            business_id,
            TransactionKind::Expense,
            attributed_to,
            None,
            amount,
            transaction_date,
        )
    }

    pub fn add_income(
        &self,
        business_id: BusinessId,
        attributed_to: Option<MembershipId>,
        amount: Decimal,
        transaction_date: NaiveDate,
    ) -> TransactionId {
        self.add_transaction(
            business_id,
            TransactionKind::Income,
            attributed_to,
            None,
            amount,
            transaction_date,
        )
    }

    pub fn add_categorized_expense(
        &self,
        business_id: BusinessId,
        category_id: Option<CategoryId>,
        amount: Decimal,
        transaction_date: NaiveDate,
    ) -> TransactionId {
        self.add_transaction(
            business_id,
            TransactionKind::Expense,
            None,
            category_id,
            amount,
            transaction_date,
        )
    }

    pub fn soft_delete_transaction(&self, id: TransactionId) {
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(stored) = transactions.iter_mut().find(|t| t.record.id == id) {
            stored.deleted = true;
        }
    }

    pub fn settlement_count(&self) -> usize {
        self.settlements.lock().unwrap().len()
    }

    pub fn audit_count(&self) -> usize {
        self.audit.lock().unwrap().len()
    }

    pub fn fail_next_audit_insert(&self) {
        self.fail_next_audit.store(true, Ordering::SeqCst);
    }

    fn sum_transactions(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        kind: TransactionKind,
    ) -> Decimal {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                !t.deleted
                    && t.business_id == business_id
                    && t.record.kind == kind
                    && t.record.attributed_to == Some(membership_id)
            })
            .map(|t| t.record.amount)
            .sum()
    }

    fn sum_settlements(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        direction: SettlementDirection,
    ) -> Decimal {
        self.settlements
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.business_id == business_id
                    && s.membership_id == membership_id
                    && s.direction == direction
            })
            .map(|s| s.amount)
            .sum()
    }

    fn bucket_start(granularity: TimeGranularity, date: NaiveDate) -> NaiveDate {
        match granularity {
            TimeGranularity::Daily => date,
            TimeGranularity::Weekly => {
                date - Days::new(u64::from(date.weekday().num_days_from_monday()))
            }
            TimeGranularity::Monthly => date.with_day(1).expect("day 1 always exists"),
        }
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn find_membership(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<Option<MembershipInfo>, StoreError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.business_id == business_id && m.id == membership_id)
            .cloned())
    }

    async fn active_memberships(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<MembershipInfo>, StoreError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.business_id == business_id && m.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BalanceSource for MemoryStore {
    async fn balance_totals(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<BalanceTotals, StoreError> {
        Ok(BalanceTotals {
            paid_out_of_pocket: self.sum_transactions(
                business_id,
                membership_id,
                TransactionKind::Expense,
            ),
            received_personally: self.sum_transactions(
                business_id,
                membership_id,
                TransactionKind::Income,
            ),
            settlements_received: self.sum_settlements(
                business_id,
                membership_id,
                SettlementDirection::BusinessToMember,
            ),
            settlements_paid: self.sum_settlements(
                business_id,
                membership_id,
                SettlementDirection::MemberToBusiness,
            ),
        })
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_attributed(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        kind: TransactionKind,
        filter: &HistoryFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut records: Vec<TransactionRecord> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                !t.deleted
                    && t.business_id == business_id
                    && t.record.kind == kind
                    && t.record.attributed_to == Some(membership_id)
                    && filter.range.contains(t.record.transaction_date)
            })
            .map(|t| t.record.clone())
            .collect();
        records.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        if let Some(limit) = filter.limit {
            records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(records)
    }
}

#[async_trait]
impl SettlementStore for MemoryStore {
    async fn list_settlements(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
        filter: &HistoryFilter,
    ) -> Result<Vec<Settlement>, StoreError> {
        let mut settlements: Vec<Settlement> = self
            .settlements
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.business_id == business_id
                    && s.membership_id == membership_id
                    && filter.range.contains(s.settlement_date)
            })
            .cloned()
            .collect();
        settlements.sort_by(|a, b| b.settlement_date.cmp(&a.settlement_date));
        if let Some(limit) = filter.limit {
            settlements.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(settlements)
    }

    async fn insert_settlement(&self, settlement: &Settlement) -> Result<(), StoreError> {
        self.settlements.lock().unwrap().push(settlement.clone());
        Ok(())
    }

    async fn delete_settlement(&self, id: SettlementId) -> Result<(), StoreError> {
        self.settlements.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        if self.fail_next_audit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected audit failure".to_string()));
        }
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn query(
        &self,
        business_id: BusinessId,
        filter: &AuditFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<AuditLogEntry>, u64), StoreError> {
        let matches: Vec<AuditLogEntry> = self
            .audit
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| {
                e.business_id == business_id
                    && filter.action.is_none_or(|a| e.action == a)
                    && filter.entity_type.is_none_or(|t| e.entity_type == t)
                    && filter.entity_id.is_none_or(|id| e.entity_id == id)
                    && filter.actor_id.is_none_or(|a| e.actor_id == a)
                    && filter.range.contains(e.created_at.date_naive())
            })
            .cloned()
            .collect();

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();
        Ok((page, total))
    }

    async fn list_for_entity(
        &self,
        business_id: BusinessId,
        entity_type: AuditEntityType,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        Ok(self
            .audit
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| {
                e.business_id == business_id
                    && e.entity_type == entity_type
                    && e.entity_id == entity_id
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn totals(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<TransactionTotals, StoreError> {
        let transactions = self.transactions.lock().unwrap();
        let mut totals = TransactionTotals::default();
        for t in transactions.iter().filter(|t| {
            !t.deleted
                && t.business_id == business_id
                && t.record.kind == kind
                && range.contains(t.record.transaction_date)
        }) {
            totals.total += t.record.amount;
            totals.count += 1;
        }
        Ok(totals)
    }

    async fn totals_by_category(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<Vec<CategoryTotal>, StoreError> {
        let transactions = self.transactions.lock().unwrap();
        let mut groups: BTreeMap<Option<CategoryId>, Decimal> = BTreeMap::new();
        for t in transactions.iter().filter(|t| {
            !t.deleted
                && t.business_id == business_id
                && t.record.kind == kind
                && range.contains(t.record.transaction_date)
        }) {
            *groups.entry(t.record.category_id).or_default() += t.record.amount;
        }
        Ok(groups
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                name: category_id
                    .map_or_else(|| "Uncategorized".to_string(), |id| id.to_string()),
                category_id,
                total,
            })
            .collect())
    }

    async fn totals_by_attribution(
        &self,
        business_id: BusinessId,
        kind: TransactionKind,
        range: DateRange,
    ) -> Result<Vec<AttributionTotal>, StoreError> {
        let transactions = self.transactions.lock().unwrap();
        let mut groups: BTreeMap<Option<MembershipId>, Decimal> = BTreeMap::new();
        for t in transactions.iter().filter(|t| {
            !t.deleted
                && t.business_id == business_id
                && t.record.kind == kind
                && range.contains(t.record.transaction_date)
        }) {
            *groups.entry(t.record.attributed_to).or_default() += t.record.amount;
        }

        let memberships = self.memberships.lock().unwrap();
        Ok(groups
            .into_iter()
            .map(|(membership_id, total)| AttributionTotal {
                display_name: membership_id.and_then(|id| {
                    memberships
                        .iter()
                        .find(|m| m.id == id)
                        .map(|m| m.display_name.clone())
                }),
                membership_id,
                total,
            })
            .collect())
    }

    async fn totals_by_period(
        &self,
        business_id: BusinessId,
        granularity: TimeGranularity,
        range: DateRange,
    ) -> Result<Vec<PeriodTotal>, StoreError> {
        let transactions = self.transactions.lock().unwrap();
        let mut buckets: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
        for t in transactions.iter().filter(|t| {
            !t.deleted && t.business_id == business_id && range.contains(t.record.transaction_date)
        }) {
            let start = Self::bucket_start(granularity, t.record.transaction_date);
            let entry = buckets.entry(start).or_default();
            match t.record.kind {
                TransactionKind::Expense => entry.0 += t.record.amount,
                TransactionKind::Income => entry.1 += t.record.amount,
            }
        }
        Ok(buckets
            .into_iter()
            .map(|(bucket_start, (expenses, incomes))| PeriodTotal {
                bucket_start,
                expenses,
                incomes,
            })
            .collect())
    }
}
