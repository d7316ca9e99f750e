//! Role definitions and the startup-time role set.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gatehouse_core::error::AppError;
use gatehouse_entity::user::BuiltinRole;

/// Wildcard permission granting everything.
pub const WILDCARD: &str = "*";

/// Permissions a role grants directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllowsRepr", into = "AllowsRepr")]
pub enum Allows {
    /// Every permission (`"*"`).
    All,
    /// An explicit permission list.
    List(Vec<String>),
}

impl Allows {
    /// Whether this grants `permission` directly.
    ///
    /// A listed `<permission>-all` also grants `<permission>`.
    pub fn grants(&self, permission: &str) -> bool {
        match self {
            Self::All => true,
            Self::List(list) => list.iter().any(|p| {
                p == WILDCARD
                    || p == permission
                    || p.strip_suffix("-all") == Some(permission)
            }),
        }
    }

    /// The permission names this contributes to a built role.
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::All => vec![WILDCARD.to_string()],
            Self::List(list) => list.clone(),
        }
    }
}

impl Default for Allows {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AllowsRepr {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<AllowsRepr> for Allows {
    type Error = String;

    fn try_from(repr: AllowsRepr) -> Result<Self, Self::Error> {
        match repr {
            AllowsRepr::One(s) if s == WILDCARD => Ok(Self::All),
            AllowsRepr::One(s) => Err(format!(
                "'allows' must be \"*\" or a list of permissions, got \"{s}\""
            )),
            AllowsRepr::Many(list) => Ok(Self::List(list)),
        }
    }
}

impl From<Allows> for AllowsRepr {
    fn from(allows: Allows) -> Self {
        match allows {
            Allows::All => Self::One(WILDCARD.to_string()),
            Allows::List(list) => Self::Many(list),
        }
    }
}

/// A named role: what it allows and which roles it inherits from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Directly granted permissions.
    #[serde(default)]
    pub allows: Allows,
    /// Roles whose permissions are inherited.
    #[serde(default)]
    pub inherits: Vec<String>,
}

/// Immutable map of role name to definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: HashMap<String, RoleDefinition>,
}

impl RoleSet {
    /// Only the built-in `user` and `admin` roles.
    pub fn builtin() -> Self {
        Self {
            roles: builtin_roles(),
        }
    }

    /// Merges custom roles underneath the built-ins, which win on collision.
    pub fn with_custom(custom: HashMap<String, RoleDefinition>) -> Self {
        let mut roles = custom;
        for (name, definition) in builtin_roles() {
            if roles.insert(name.clone(), definition).is_some() {
                warn!(role = %name, "Custom role ignored: built-in roles cannot be overridden");
            }
        }
        Self { roles }
    }

    /// Loads custom roles from an optional JSON file.
    ///
    /// A missing file yields the built-ins only. Malformed JSON is a
    /// configuration error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::builtin());
        };

        if !path.exists() {
            info!(path = %path.display(), "No custom roles file, using built-in roles");
            return Ok(Self::builtin());
        }

        let raw = std::fs::read_to_string(path)?;
        let custom: HashMap<String, RoleDefinition> = serde_json::from_str(&raw).map_err(|e| {
            AppError::configuration(format!(
                "Invalid roles file '{}': {e}",
                path.display()
            ))
        })?;

        info!(path = %path.display(), count = custom.len(), "Loaded custom roles");
        Ok(Self::with_custom(custom))
    }

    /// Looks up a role by name.
    pub fn get(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.get(name)
    }

    /// Number of known roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the set is empty. Never true for a set built by this module.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_roles() -> HashMap<String, RoleDefinition> {
    HashMap::from([
        (
            BuiltinRole::User.as_str().to_string(),
            RoleDefinition::default(),
        ),
        (
            BuiltinRole::Admin.as_str().to_string(),
            RoleDefinition {
                allows: Allows::All,
                inherits: Vec::new(),
            },
        ),
    ])
}
