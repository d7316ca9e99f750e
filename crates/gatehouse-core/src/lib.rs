//! # gatehouse-core
//!
//! Core crate for Gatehouse. Contains the configuration schemas and the
//! unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other Gatehouse crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind, ErrorReason};
pub use result::AppResult;
