//! Persistence of users and refresh-token sessions.

pub mod credential;
pub mod memory;
pub mod postgres;

pub use credential::CredentialStore;
pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;
