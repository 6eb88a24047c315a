//! Role API Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{CategoryGrant, PermissionKey, Role, RoleCreate, RoleUpdate};
use std::collections::BTreeMap;

use crate::core::ServerState;

/// Query filter for role listing
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    /// If true, include inactive roles
    all: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionsPayload {
    pub permissions: Vec<PermissionKey>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub granted: bool,
}

#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub role_id: i64,
    pub categories: BTreeMap<String, CategoryGrant>,
}

/// GET /api/roles - list roles, active only unless ?all=true
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RoleQuery>,
) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.store.roles(query.all.unwrap_or(false))))
}

/// GET /api/roles/{id} - get role by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let role = state
        .store
        .role(id)
        .ok_or_else(|| AppError::not_found(format!("Role {id}")))?;
    Ok(Json(role))
}

/// POST /api/roles - create a role
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    tracing::info!(role_name = %payload.name, "Creating role");
    let role = state.create_role(payload).await?;
    Ok(Json(role))
}

/// PUT /api/roles/{id} - update a role
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    tracing::info!(role_id = id, "Updating role");
    let role = state.update_role(id, payload).await?;
    Ok(Json(role))
}

/// DELETE /api/roles/{id} - delete a role
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(role_id = id, "Deleting role");
    state.delete_role(id).await?;
    Ok(Json(true))
}

/// GET /api/roles/{id}/permissions - the role's permission keys
pub async fn get_permissions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PermissionKey>>> {
    let role = state
        .store
        .role(id)
        .ok_or_else(|| AppError::not_found(format!("Role {id}")))?;
    Ok(Json(role.permissions.into_iter().collect()))
}

/// PUT /api/roles/{id}/permissions - replace the role's permission set
pub async fn update_permissions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PermissionsPayload>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        role_id = id,
        count = payload.permissions.len(),
        "Replacing role permissions"
    );
    let role = state
        .update_role(
            id,
            RoleUpdate {
                permissions: Some(payload.permissions),
                ..RoleUpdate::default()
            },
        )
        .await?;
    Ok(Json(role))
}

/// GET /api/roles/{id}/summary - per-category grant coverage
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleSummary>> {
    if state.store.role(id).is_none() {
        return Err(AppError::not_found(format!("Role {id}")));
    }
    Ok(Json(RoleSummary {
        role_id: id,
        categories: state.authz.summarize_role_permissions(id),
    }))
}

/// PUT /api/roles/{id}/categories/{category} - bulk grant or revoke a
/// whole category
pub async fn set_category(
    State(state): State<ServerState>,
    Path((id, category)): Path<(i64, String)>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        role_id = id,
        category = %category,
        granted = payload.granted,
        "Setting category permissions"
    );
    let role = state
        .set_category_permissions(id, &category, payload.granted)
        .await?;
    Ok(Json(role))
}
