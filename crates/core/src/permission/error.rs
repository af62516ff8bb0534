//! Permission error types.

use thiserror::Error;

use super::capability::Capability;
use super::role::Role;

/// Errors raised when resolving or enforcing permissions.
///
/// Both variants are deterministic and safe to show to end users; each
/// names exactly what was denied so the caller can render a precise
/// message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// The effective permission set does not grant the capability.
    #[error("Missing capability: {capability}")]
    MissingCapability {
        /// The capability that was required.
        capability: Capability,
    },

    /// The assigner's role may not assign the target role.
    #[error("Role {assigner} may not assign role {target}")]
    RoleNotAssignable {
        /// The role attempting the assignment.
        assigner: Role,
        /// The role being assigned.
        target: Role,
    },
}

impl PermissionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCapability { .. } => "MISSING_CAPABILITY",
            Self::RoleNotAssignable { .. } => "ROLE_NOT_ASSIGNABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_capability() {
        let err = PermissionError::MissingCapability {
            capability: Capability::CreateSettlement,
        };
        assert_eq!(err.to_string(), "Missing capability: create-settlement");
    }

    #[test]
    fn test_error_display_names_the_transition() {
        let err = PermissionError::RoleNotAssignable {
            assigner: Role::Admin,
            target: Role::Owner,
        };
        assert_eq!(err.to_string(), "Role admin may not assign role owner");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PermissionError::MissingCapability {
                capability: Capability::ViewLedger,
            }
            .error_code(),
            "MISSING_CAPABILITY"
        );
        assert_eq!(
            PermissionError::RoleNotAssignable {
                assigner: Role::Employee,
                target: Role::Admin,
            }
            .error_code(),
            "ROLE_NOT_ASSIGNABLE"
        );
    }
}
