//! User domain entities.

pub mod model;
pub mod role;

pub use model::{NewUser, User, UserSummary};
pub use role::BuiltinRole;
