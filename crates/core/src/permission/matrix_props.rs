//! Property-based tests for the capability matrix and permission resolution.

use proptest::prelude::*;

use super::capability::Capability;
use super::resolver::{has_permission, PermissionOverrides, PermissionSet};
use super::role::Role;

/// Strategy to generate any role.
fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Owner),
        Just(Role::CoOwner),
        Just(Role::Admin),
        Just(Role::Accountant),
        Just(Role::Employee),
    ]
}

static ALL_CAPABILITIES: [Capability; 25] = Capability::ALL;

/// Strategy to generate any capability.
fn capability_strategy() -> impl Strategy<Value = Capability> {
    prop::sample::select(&ALL_CAPABILITIES[..])
}

/// Strategy to generate a sparse override map.
fn overrides_strategy() -> impl Strategy<Value = PermissionOverrides> {
    prop::collection::btree_map(capability_strategy(), any::<bool>(), 0..=25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every capability is defined for every role: resolution never falls
    /// through to an implicit default.
    #[test]
    fn prop_matrix_is_total(
        role in role_strategy(),
        capability in capability_strategy(),
    ) {
        let set = PermissionSet::defaults_for(role);
        prop_assert_eq!(set.allows(capability), capability.default_grant(role));
    }

    /// Overrides are key-scoped: an overridden key takes the override value,
    /// every other key keeps the role default.
    #[test]
    fn prop_overrides_are_key_scoped(
        role in role_strategy(),
        overrides in overrides_strategy(),
        capability in capability_strategy(),
    ) {
        let set = PermissionSet::effective(role, &overrides);
        let expected = overrides
            .get(&capability)
            .copied()
            .unwrap_or_else(|| capability.default_grant(role));
        prop_assert_eq!(set.allows(capability), expected);
    }

    /// has_permission agrees with full resolution.
    #[test]
    fn prop_has_permission_agrees_with_effective(
        role in role_strategy(),
        overrides in overrides_strategy(),
        capability in capability_strategy(),
    ) {
        prop_assert_eq!(
            has_permission(role, &overrides, capability),
            PermissionSet::effective(role, &overrides).allows(capability)
        );
    }

    /// The escalation guard: can_assign is never true for an equal or
    /// higher-ranked target unless the assigner is Owner.
    #[test]
    fn prop_can_assign_never_escalates(
        assigner in role_strategy(),
        target in role_strategy(),
    ) {
        if assigner.can_assign(target) {
            prop_assert!(
                assigner == Role::Owner || assigner.rank() > target.rank(),
                "{} assigned {}",
                assigner,
                target
            );
        }
    }

    /// Overrides never influence role assignment: a non-Owner stays unable
    /// to assign an equal or higher rank no matter what overrides say.
    #[test]
    fn prop_overrides_cannot_reach_assignment(
        assigner in role_strategy(),
        target in role_strategy(),
        overrides in overrides_strategy(),
    ) {
        let _ = PermissionSet::effective(assigner, &overrides);
        if assigner != Role::Owner && target.rank() >= assigner.rank() {
            prop_assert!(!assigner.can_assign(target));
        }
    }

    /// assignable_roles is exactly the filter of can_assign over all roles.
    #[test]
    fn prop_assignable_roles_consistent(assigner in role_strategy()) {
        let assignable = assigner.assignable_roles();
        for target in Role::ALL {
            prop_assert_eq!(assignable.contains(&target), assigner.can_assign(target));
        }
    }
}
