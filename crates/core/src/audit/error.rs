//! Audit error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while recording or querying the audit trail.
///
/// The trail has no validation of its own; the only failure mode is the
/// storage layer, and those errors propagate rather than being swallowed. A
/// mutation whose audit record failed to write is not considered audited.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Store(_) => "AUDIT_STORAGE_ERROR",
        }
    }
}
