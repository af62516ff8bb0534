//! Repository implementations of the core store traits.

pub mod audit_log;
pub mod ledger;
pub mod membership;
pub mod settlement;
pub mod transaction;

pub use audit_log::AuditLogRepository;
pub use ledger::LedgerRepository;
pub use membership::MembershipRepository;
pub use settlement::SettlementRepository;
pub use transaction::TransactionRepository;

use patungan_core::store::StoreError;
use sea_orm::DbErr;

/// Maps a database error onto the core store boundary.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}
