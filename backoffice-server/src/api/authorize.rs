//! Authorization query API
//!
//! Pure reads; answers are always 200 with an `allowed` flag so
//! callers can treat every response uniformly. Malformed or unknown
//! inputs come back as denials.

use crate::core::ServerState;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UserAuthzQuery {
    pub user_id: i64,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleAuthzQuery {
    pub role_id: i64,
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct AuthzDecision {
    pub allowed: bool,
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/authorize", get(check_user))
        .route("/api/authorize/role", get(check_role))
}

/// GET /api/authorize?user_id=&permission= - may this user do this?
async fn check_user(
    State(state): State<ServerState>,
    Query(query): Query<UserAuthzQuery>,
) -> Json<AuthzDecision> {
    let allowed = state
        .authz
        .user_has_permission(query.user_id, &query.permission);
    Json(AuthzDecision { allowed })
}

/// GET /api/authorize/role?role_id=&permission= - does this role grant it?
async fn check_role(
    State(state): State<ServerState>,
    Query(query): Query<RoleAuthzQuery>,
) -> Json<AuthzDecision> {
    let allowed = state
        .authz
        .role_has_permission(query.role_id, &query.permission);
    Json(AuthzDecision { allowed })
}
