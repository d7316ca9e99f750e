//! User account operations.

pub mod service;

pub use service::AccountService;
