//! # gatehouse-api
//!
//! HTTP API layer for Gatehouse built on Axum.
//!
//! Provides the REST endpoints, the access-gate middleware, extractors,
//! DTOs and cookie handling. Errors render through `AppError`'s
//! `IntoResponse` implementation in `gatehouse-core`.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
