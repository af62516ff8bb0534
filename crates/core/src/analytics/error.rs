//! Analytics error types.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Errors that can occur while building analytics rollups.
///
/// The aggregator adds no failure modes of its own: everything here is a
/// propagated store or ledger error.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The ledger summary composition failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An aggregate query failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AnalyticsError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }
}
