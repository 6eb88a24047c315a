//! System User API Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::{AppError, AppResult};
use shared::models::{SystemUser, UserCreate, UserUpdate};

use crate::core::ServerState;

/// Query filter for user listing
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    /// Restrict to users of one role
    role_id: Option<i64>,
}

/// GET /api/users - list users, optionally by role
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<SystemUser>>> {
    let users = match query.role_id {
        Some(role_id) => state.store.users_by_role(role_id),
        None => state.store.users(),
    };
    Ok(Json(users))
}

/// GET /api/users/{id} - get user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SystemUser>> {
    let user = state
        .store
        .user(id)
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(user))
}

/// POST /api/users - create a user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<SystemUser>> {
    tracing::info!(
        user_name = %payload.name,
        role_id = payload.role_id,
        "Creating user"
    );
    let user = state.create_user(payload).await?;
    Ok(Json(user))
}

/// PUT /api/users/{id} - update a user
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<SystemUser>> {
    tracing::info!(user_id = id, "Updating user");
    let user = state.update_user(id, payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id} - delete a user
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = id, "Deleting user");
    state.delete_user(id).await?;
    Ok(Json(true))
}

/// POST /api/users/{id}/login - record a successful login
pub async fn record_login(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SystemUser>> {
    let user = state.touch_last_login(id).await?;
    Ok(Json(user))
}
