//! # gatehouse-database
//!
//! PostgreSQL connection management, migrations and the repositories for
//! users, refresh-token sessions and imported data lines.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
