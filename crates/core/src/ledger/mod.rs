//! Member balance computation and settlements.
//!
//! This module implements the shared-finance ledger:
//! - Signed member balance arithmetic (who owes whom)
//! - Business-wide balance summaries
//! - Settlement suggestion, validation, and creation
//! - Windowed balance history listings
//! - Store traits for the transaction/settlement/membership boundary
//!
//! Balances are never cached or incrementally maintained; every read
//! recomputes from the source aggregates so a balance can only observe
//! committed state.

pub mod balance;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::suggested_settlement;
pub use engine::LedgerEngine;
pub use error::LedgerError;
pub use store::{
    BalanceSource, BalanceTotals, MembershipStore, SettlementStore, TransactionStore,
};
pub use types::{
    BalanceHistory, CreateSettlement, HistoryFilter, LedgerSummary, MemberBalance, MembershipInfo,
    Settlement, SettlementDirection, SettlementOutcome, SuggestedSettlement, TransactionKind,
    TransactionRecord,
};
