//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness and record counts
//! - [`permissions`] - permission catalog (read-only)
//! - [`roles`] - role management
//! - [`users`] - system user management
//! - [`authorize`] - authorization queries

pub mod authorize;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// All API routes, unlayered
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(permissions::router())
        .merge(roles::router())
        .merge(users::router())
        .merge(authorize::router())
}

/// The complete application: routes, middleware, state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
