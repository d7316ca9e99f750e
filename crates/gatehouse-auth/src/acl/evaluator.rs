//! Permission checks over a [`RoleSet`].

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use gatehouse_core::error::{AppError, ErrorReason};
use gatehouse_entity::user::BuiltinRole;

use super::roles::{RoleDefinition, RoleSet, WILDCARD};

/// Pseudo-permission satisfied by any verified access token.
pub const VALID_TOKEN: &str = "validtoken";

/// Effective permissions of a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePermissions {
    /// Wildcard; every permission.
    All,
    /// Explicit permission names, sorted.
    Set(BTreeSet<String>),
}

impl Serialize for RolePermissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(WILDCARD),
            Self::Set(set) => set.serialize(serializer),
        }
    }
}

/// Resolves role permissions, following inheritance.
#[derive(Debug, Clone)]
pub struct AclEvaluator {
    roles: Arc<RoleSet>,
}

impl AclEvaluator {
    /// Creates an evaluator over a shared role set.
    pub fn new(roles: Arc<RoleSet>) -> Self {
        Self { roles }
    }

    /// Whether `role` grants `permission`, directly or through inheritance.
    pub fn is_allowed(&self, role: &str, permission: &str) -> bool {
        self.allowed(role, permission, &mut HashSet::new())
    }

    /// Union of the role's own and inherited permission names.
    pub fn build_roles(&self, role: &str) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect(role, &mut out, &mut HashSet::new());
        out
    }

    /// Effective permissions, collapsed to `All` when the wildcard is present.
    pub fn get_roles(&self, role: &str) -> RolePermissions {
        let built = self.build_roles(role);
        if built.contains(WILDCARD) {
            RolePermissions::All
        } else {
            RolePermissions::Set(built.into_iter().collect())
        }
    }

    /// Fails with `Forbidden(InsufficientPrivileges)` unless allowed.
    pub fn require(&self, role: &str, permission: &str) -> Result<(), AppError> {
        if permission == VALID_TOKEN || self.is_allowed(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(ErrorReason::InsufficientPrivileges))
        }
    }

    /// Unknown roles fall back to `user`.
    fn resolve<'a>(&'a self, role: &'a str) -> Option<(&'a str, &'a RoleDefinition)> {
        match self.roles.get(role) {
            Some(definition) => Some((role, definition)),
            None => {
                let fallback = BuiltinRole::User.as_str();
                self.roles.get(fallback).map(|d| (fallback, d))
            }
        }
    }

    fn allowed(&self, role: &str, permission: &str, visited: &mut HashSet<String>) -> bool {
        let Some((name, definition)) = self.resolve(role) else {
            return false;
        };
        if !visited.insert(name.to_string()) {
            return false;
        }
        if definition.allows.grants(permission) {
            return true;
        }
        definition
            .inherits
            .iter()
            .any(|parent| self.allowed(parent, permission, visited))
    }

    fn collect(&self, role: &str, out: &mut HashSet<String>, visited: &mut HashSet<String>) {
        let Some((name, definition)) = self.resolve(role) else {
            return;
        };
        if !visited.insert(name.to_string()) {
            return;
        }
        out.extend(definition.allows.names());
        for parent in &definition.inherits {
            self.collect(parent, out, visited);
        }
    }
}
