//! Append-only audit trail.
//!
//! Every state mutation in the system is paired with exactly one audit
//! entry. Entries are immutable: the store boundary only exposes insert and
//! read operations, and nothing in this module updates or deletes an entry
//! once recorded.

pub mod builders;
pub mod error;
pub mod trail;
pub mod types;

pub use error::AuditError;
pub use trail::{AuditStore, AuditTrail};
pub use types::{
    AuditAction, AuditEntityType, AuditFilter, AuditLogEntry, AuditPage, NewAuditEntry,
};
