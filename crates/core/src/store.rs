//! Types shared by every injected store boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by store implementations.
///
/// Store errors indicate infrastructure problems, never business-rule
/// violations. They propagate to the caller unchanged; nothing in the core
/// retries or swallows them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed (connection, query, constraint).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A concurrent writer invalidated this operation.
    #[error("Storage conflict: {0}")]
    Conflict(String),
}

/// Inclusive date range filter for aggregate and history queries.
///
/// `None` bounds are open: a default `DateRange` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest date to include (inclusive).
    pub start: Option<NaiveDate>,
    /// Latest date to include (inclusive).
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range with both bounds open.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Creates a range between two inclusive bounds.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Returns true if `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}
