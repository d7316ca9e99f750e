//! # gatehouse-auth
//!
//! Authentication and authorization for Gatehouse.
//!
//! ## Modules
//!
//! - `jwt` — access and refresh token signing and verification
//! - `password` — Argon2id hashing and password policy
//! - `acl` — role-based permission evaluation with inheritance
//! - `store` — credential store trait with PostgreSQL and in-memory backends
//! - `session` — login and refresh-token rotation
//! - `gate` — per-request credential parsing and authorization

pub mod acl;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod session;
pub mod store;

pub use acl::{AclEvaluator, RolePermissions, RoleSet};
pub use gate::AccessGate;
pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims};
pub use password::{PasswordHasher, PasswordPolicy, PolicyViolation};
pub use session::SessionManager;
pub use store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
