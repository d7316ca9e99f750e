//! Login and refresh-token rotation.

pub mod manager;

pub use manager::SessionManager;
