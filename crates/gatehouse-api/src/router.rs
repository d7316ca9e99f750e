//! Route definitions for the Gatehouse HTTP API.
//!
//! All routes are mounted under `/api`. Protected routes carry their
//! access-gate middleware as a route layer so the permission sits next
//! to the path it guards.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(user_routes(&state))
        .merge(reader_routes(&state))
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Bootstrap, login, refresh, verify, permissions
fn user_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user/verify", get(handlers::user::verify))
        .route("/user/permissions", get(handlers::user::permissions))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_valid_token,
        ));

    Router::new()
        .route("/user/init", post(handlers::user::init))
        .route("/user/token", post(handlers::user::token))
        .route("/user/refreshtoken", post(handlers::user::refresh_token))
        .merge(protected)
}

/// Daily file import
fn reader_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/reader/read", get(handlers::reader::read))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_reader_import,
        ))
}

/// Health probes (unauthenticated)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/metrics", get(handlers::health::metrics))
        .route("/health/ready", get(handlers::health::ready))
        .route("/health/live", get(handlers::health::live))
}
