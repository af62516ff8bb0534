//! Role capability matrix and permission resolution.
//!
//! This module implements:
//! - The closed role hierarchy with strict total ranks
//! - The role -> capability default matrix (total by exhaustive matching)
//! - Effective permission resolution with per-membership overrides
//! - The role assignment guard (`Role::can_assign`)
//!
//! Everything here is pure and synchronous; unknown roles or capabilities
//! are unrepresentable, so there are no runtime lookup failures.

pub mod capability;
pub mod error;
pub mod resolver;
pub mod role;

#[cfg(test)]
mod matrix_props;

pub use capability::Capability;
pub use error::PermissionError;
pub use resolver::{has_permission, PermissionOverrides, PermissionSet};
pub use role::Role;
