//! Permission catalog API (read-only)

use crate::core::ServerState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use shared::models::PermissionCategory;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/permissions", get(list))
}

/// GET /api/permissions - the full catalog, in display order
async fn list(State(state): State<ServerState>) -> Json<Vec<PermissionCategory>> {
    Json(state.catalog().categories().to_vec())
}
