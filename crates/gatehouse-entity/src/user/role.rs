//! Built-in role names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles that always exist regardless of custom role configuration.
///
/// Custom roles are plain strings; these two are the only names the
/// application itself relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinRole {
    /// Authenticated user with no specific permission.
    User,
    /// Wildcard role, allowed everything.
    Admin,
}

impl BuiltinRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for BuiltinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BuiltinRole {
    type Err = gatehouse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(gatehouse_core::AppError::bad_parameters(format!(
                "'{s}' is not a built-in role. Expected one of: user, admin"
            ))),
        }
    }
}
