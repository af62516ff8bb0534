//! Member roles and the role assignment guard.

use serde::{Deserialize, Serialize};

use super::error::PermissionError;

/// Member role in the business hierarchy.
///
/// Roles are ordered from lowest to highest privilege. Higher roles can
/// perform all actions of lower roles unless the capability matrix says
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Day-to-day participant: records transactions, sees their own slice.
    Employee = 1,
    /// Keeps the books: full transaction and settlement access.
    Accountant = 2,
    /// Manages members and configuration.
    Admin = 3,
    /// Full access except archiving the business.
    CoOwner = 4,
    /// Full access including ownership transfer.
    Owner = 5,
}

impl Role {
    /// Every role, highest rank first.
    pub const ALL: [Self; 5] = [
        Self::Owner,
        Self::CoOwner,
        Self::Admin,
        Self::Accountant,
        Self::Employee,
    ];

    /// The role's position in the strict total rank (Owner=5 .. Employee=1).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            "co-owner" => Some(Self::CoOwner),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
            Self::CoOwner => "co-owner",
            Self::Owner => "owner",
        }
    }

    /// Returns true if this role may assign `target` to another membership.
    ///
    /// Owner may assign any role, including Owner itself. Every other role
    /// may only assign roles strictly lower-ranked than its own. This is the
    /// privilege-escalation guard: it is not a capability, so permission
    /// overrides can never reach it.
    #[must_use]
    pub const fn can_assign(self, target: Self) -> bool {
        matches!(self, Self::Owner) || self.rank() > target.rank()
    }

    /// Returns an error naming the attempted transition when `can_assign`
    /// is false.
    pub fn ensure_can_assign(self, target: Self) -> Result<(), PermissionError> {
        if self.can_assign(target) {
            Ok(())
        } else {
            Err(PermissionError::RoleNotAssignable {
                assigner: self,
                target,
            })
        }
    }

    /// The set of roles this role may assign.
    #[must_use]
    pub fn assignable_roles(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_assign(*target))
            .collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("owner"), Some(Role::Owner));
        assert_eq!(Role::parse("CO-OWNER"), Some(Role::CoOwner));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("accountant"), Some(Role::Accountant));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn test_role_as_str_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_ranks_are_strict_and_total() {
        let mut ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_role_ordering_follows_rank() {
        assert!(Role::Owner > Role::CoOwner);
        assert!(Role::CoOwner > Role::Admin);
        assert!(Role::Admin > Role::Accountant);
        assert!(Role::Accountant > Role::Employee);
    }

    #[test]
    fn test_owner_assigns_any_role_including_owner() {
        for target in Role::ALL {
            assert!(Role::Owner.can_assign(target));
        }
    }

    #[test]
    fn test_non_owner_cannot_assign_equal_or_higher() {
        assert!(!Role::CoOwner.can_assign(Role::Owner));
        assert!(!Role::CoOwner.can_assign(Role::CoOwner));
        assert!(!Role::Admin.can_assign(Role::Admin));
        assert!(!Role::Accountant.can_assign(Role::Admin));
        assert!(!Role::Employee.can_assign(Role::Employee));
    }

    #[test]
    fn test_non_owner_assigns_strictly_lower() {
        assert!(Role::CoOwner.can_assign(Role::Admin));
        assert!(Role::CoOwner.can_assign(Role::Employee));
        assert!(Role::Admin.can_assign(Role::Accountant));
        assert!(Role::Accountant.can_assign(Role::Employee));
        assert!(Role::Employee.assignable_roles().is_empty());
    }

    #[test]
    fn test_assignable_roles_matches_can_assign() {
        for assigner in Role::ALL {
            let assignable = assigner.assignable_roles();
            for target in Role::ALL {
                assert_eq!(
                    assignable.contains(&target),
                    assigner.can_assign(target),
                    "{assigner} -> {target}"
                );
            }
        }
    }

    #[test]
    fn test_ensure_can_assign_names_the_transition() {
        let err = Role::Admin.ensure_can_assign(Role::Owner).unwrap_err();
        match err {
            PermissionError::RoleNotAssignable { assigner, target } => {
                assert_eq!(assigner, Role::Admin);
                assert_eq!(target, Role::Owner);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
