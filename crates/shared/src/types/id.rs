//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where a
//! `BusinessId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user account.");
typed_id!(BusinessId, "Unique identifier for a business.");
typed_id!(
    MembershipId,
    "Unique identifier for a member's participation in a business."
);
typed_id!(TransactionId, "Unique identifier for an expense or income.");
typed_id!(SettlementId, "Unique identifier for a settlement.");
typed_id!(CategoryId, "Unique identifier for a transaction category.");
typed_id!(AuditLogId, "Unique identifier for an audit log entry.");
typed_id!(InviteId, "Unique identifier for a membership invite.");
typed_id!(AttachmentId, "Unique identifier for a transaction attachment.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        let a = BusinessId::new();
        let b = BusinessId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = MembershipId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_display_and_parse() {
        let id = SettlementId::new();
        let parsed = SettlementId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(UserId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let earlier = AuditLogId::new();
        let later = AuditLogId::new();
        assert!(earlier.into_inner() <= later.into_inner());
    }
}
