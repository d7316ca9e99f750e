//! Role-based permission evaluation with inheritance.
//!
//! Roles are loaded once at startup into an immutable [`RoleSet`]; the
//! [`AclEvaluator`] answers permission questions against it without I/O.

pub mod evaluator;
pub mod roles;

pub use evaluator::{AclEvaluator, RolePermissions, VALID_TOKEN};
pub use roles::{Allows, RoleDefinition, RoleSet};
