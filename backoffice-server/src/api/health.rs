//! Health check

use crate::core::ServerState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub roles: usize,
    pub users: usize,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// GET /health - liveness plus record counts
async fn health(State(state): State<ServerState>) -> Json<HealthStatus> {
    let (roles, users) = state.store.counts();
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        roles,
        users,
    })
}
