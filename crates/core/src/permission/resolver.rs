//! Effective permission resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::capability::Capability;
use super::error::PermissionError;
use super::role::Role;

/// Sparse per-membership permission overrides.
///
/// Only keys present in the map replace the role default; absent keys keep
/// the default. Role assignment has no key here by construction.
pub type PermissionOverrides = BTreeMap<Capability, bool>;

/// A fully resolved permission set: one boolean per capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    grants: BTreeMap<Capability, bool>,
}

impl PermissionSet {
    /// The role's default matrix row, no overrides applied.
    #[must_use]
    pub fn defaults_for(role: Role) -> Self {
        let grants = Capability::ALL
            .into_iter()
            .map(|capability| (capability, capability.default_grant(role)))
            .collect();
        Self { grants }
    }

    /// The role's matrix row with `overrides` applied key-by-key.
    #[must_use]
    pub fn effective(role: Role, overrides: &PermissionOverrides) -> Self {
        let mut set = Self::defaults_for(role);
        for (capability, granted) in overrides {
            set.grants.insert(*capability, *granted);
        }
        set
    }

    /// Returns true if the set grants `capability`.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        // defaults_for seeds every key, so the lookup is total.
        self.grants.get(&capability).copied().unwrap_or(false)
    }

    /// Returns an error naming `capability` when it is not granted.
    pub fn require(&self, capability: Capability) -> Result<(), PermissionError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(PermissionError::MissingCapability { capability })
        }
    }

    /// Iterates over every (capability, granted) pair.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.grants.iter().map(|(c, g)| (*c, *g))
    }

    /// The capabilities currently granted.
    #[must_use]
    pub fn granted(&self) -> Vec<Capability> {
        self.grants
            .iter()
            .filter_map(|(c, g)| g.then_some(*c))
            .collect()
    }
}

/// Convenience check combining resolution and lookup.
#[must_use]
pub fn has_permission(role: Role, overrides: &PermissionOverrides, capability: Capability) -> bool {
    PermissionSet::effective(role, overrides).allows(capability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_matrix_for_every_role() {
        for role in Role::ALL {
            let set = PermissionSet::defaults_for(role);
            for capability in Capability::ALL {
                assert_eq!(
                    set.allows(capability),
                    capability.default_grant(role),
                    "{role} / {capability}"
                );
            }
        }
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        for role in Role::ALL {
            assert_eq!(
                PermissionSet::effective(role, &PermissionOverrides::new()),
                PermissionSet::defaults_for(role)
            );
        }
    }

    #[test]
    fn test_override_grants_a_denied_capability() {
        let overrides =
            PermissionOverrides::from([(Capability::CreateSettlement, true)]);
        let set = PermissionSet::effective(Role::Employee, &overrides);
        assert!(set.allows(Capability::CreateSettlement));
        // Untouched keys keep the employee defaults.
        assert!(!set.allows(Capability::ViewAuditLog));
        assert!(set.allows(Capability::CreateExpense));
    }

    #[test]
    fn test_override_revokes_a_default_capability() {
        let overrides = PermissionOverrides::from([(Capability::CreateExpense, false)]);
        let set = PermissionSet::effective(Role::Accountant, &overrides);
        assert!(!set.allows(Capability::CreateExpense));
        assert!(set.allows(Capability::CreateIncome));
    }

    #[test]
    fn test_redundant_override_is_harmless() {
        let overrides = PermissionOverrides::from([(Capability::ViewBusiness, true)]);
        let set = PermissionSet::effective(Role::Owner, &overrides);
        assert_eq!(set, PermissionSet::defaults_for(Role::Owner));
    }

    #[test]
    fn test_require_names_missing_capability() {
        let set = PermissionSet::defaults_for(Role::Employee);
        let err = set.require(Capability::CreateSettlement).unwrap_err();
        assert_eq!(
            err,
            PermissionError::MissingCapability {
                capability: Capability::CreateSettlement,
            }
        );
        assert!(set.require(Capability::CreateExpense).is_ok());
    }

    #[test]
    fn test_has_permission_shortcut() {
        assert!(has_permission(
            Role::Owner,
            &PermissionOverrides::new(),
            Capability::ArchiveBusiness
        ));
        assert!(!has_permission(
            Role::Employee,
            &PermissionOverrides::new(),
            Capability::ViewLedger
        ));
    }

    #[test]
    fn test_granted_lists_only_granted() {
        let set = PermissionSet::defaults_for(Role::Employee);
        let granted = set.granted();
        assert!(granted.contains(&Capability::CreateExpense));
        assert!(!granted.contains(&Capability::ViewAuditLog));
    }
}
