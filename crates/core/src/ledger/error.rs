//! Ledger error types.

use patungan_shared::types::{BusinessId, MembershipId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::audit::AuditError;
use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Settlement amount must be strictly positive.
    #[error("Settlement amount must be positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// The membership does not belong to the business.
    #[error("Membership {membership_id} not found in business {business_id}")]
    MembershipNotFound {
        /// The business that was queried.
        business_id: BusinessId,
        /// The membership that was not found.
        membership_id: MembershipId,
    },

    // ========== Concurrency Errors ==========
    /// The balance changed between read and settlement creation.
    #[error("Balance changed since it was read: expected {expected}, found {actual}")]
    BalanceChanged {
        /// The balance the caller settled against.
        expected: Decimal,
        /// The balance found immediately before the write.
        actual: Decimal,
    },

    // ========== Propagated Errors ==========
    /// The audit write paired with a mutation failed; the mutation is not
    /// durably completed.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// A store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_SETTLEMENT_AMOUNT",
            Self::MembershipNotFound { .. } => "MEMBERSHIP_NOT_FOUND",
            Self::BalanceChanged { .. } => "BALANCE_CHANGED",
            Self::Audit(_) => "AUDIT_WRITE_FAILED",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if retrying the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BalanceChanged { .. })
    }
}
