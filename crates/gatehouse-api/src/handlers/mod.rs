//! Route handlers organized by domain.

pub mod health;
pub mod reader;
pub mod user;
