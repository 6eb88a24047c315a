//! Role operations
//!
//! Mutation rules enforced here, at the data layer, for every caller:
//! - system roles can never be edited or deleted;
//! - a role with assigned users cannot be deleted;
//! - created/updated permission sets must exist in the catalog.

use super::{AccessState, AccessStore};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CategoryGrant, PermissionKey, Role, RoleCreate, RoleUpdate};
use std::collections::{BTreeMap, BTreeSet};

impl AccessStore {
    /// Create a role. New roles are never system roles and start with
    /// no assigned users.
    pub fn create_role(&self, data: RoleCreate) -> AppResult<Role> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Role name is required").with_detail("field", "name"));
        }
        if data.permissions.is_empty() {
            return Err(
                AppError::validation("At least one permission is required")
                    .with_detail("field", "permissions"),
            );
        }
        let permissions = self.checked_permission_set(&data.permissions)?;

        let mut state = self.inner.write();
        check_name_available(&state, &name, None)?;

        let id = state.next_role_id;
        state.next_role_id += 1;

        let role = Role {
            id,
            name,
            description: data.description,
            permissions,
            is_system: false,
            is_active: data.is_active.unwrap_or(true),
            user_count: 0,
        };
        state.roles.insert(id, role.clone());
        Ok(role)
    }

    /// Update a role. System roles reject every edit.
    pub fn update_role(&self, id: i64, data: RoleUpdate) -> AppResult<Role> {
        let name = match data.name {
            Some(raw) => {
                let name = raw.trim().to_string();
                if name.is_empty() {
                    return Err(
                        AppError::validation("Role name is required").with_detail("field", "name")
                    );
                }
                Some(name)
            }
            None => None,
        };
        let permissions = match data.permissions {
            Some(keys) => {
                if keys.is_empty() {
                    return Err(
                        AppError::validation("At least one permission is required")
                            .with_detail("field", "permissions"),
                    );
                }
                Some(self.checked_permission_set(&keys)?)
            }
            None => None,
        };

        let mut state = self.inner.write();
        let existing = state
            .roles
            .get(&id)
            .ok_or_else(|| role_not_found(id))?;
        if existing.is_system {
            return Err(system_role_rejected(&existing.name));
        }
        if let Some(ref name) = name {
            check_name_available(&state, name, Some(id))?;
        }

        let role = state.roles.get_mut(&id).ok_or_else(|| role_not_found(id))?;
        if let Some(name) = name {
            role.name = name;
        }
        if let Some(description) = data.description {
            role.description = Some(description);
        }
        if let Some(permissions) = permissions {
            role.permissions = permissions;
        }
        if let Some(is_active) = data.is_active {
            role.is_active = is_active;
        }
        let updated = role.clone();

        // Keep denormalized user role names in sync
        let role_name = updated.name.clone();
        for user in state.users.values_mut().filter(|u| u.role_id == id) {
            user.role = role_name.clone();
        }

        Ok(updated)
    }

    /// Delete a role. Fails for system roles regardless of assignment,
    /// and for any role that still has users. Returns the removed role.
    pub fn delete_role(&self, id: i64) -> AppResult<Role> {
        let mut state = self.inner.write();
        let role = state.roles.get(&id).ok_or_else(|| role_not_found(id))?;
        if role.is_system {
            return Err(AppError::with_message(
                ErrorCode::RoleIsSystem,
                format!("Cannot delete system role '{}'", role.name),
            ));
        }
        if role.user_count > 0 {
            return Err(AppError::with_message(
                ErrorCode::RoleInUse,
                format!(
                    "Cannot delete role '{}': {} users assigned",
                    role.name, role.user_count
                ),
            )
            .with_detail("user_count", role.user_count));
        }
        state.roles.remove(&id).ok_or_else(|| role_not_found(id))
    }

    /// Look up a role by id
    pub fn role(&self, id: i64) -> Option<Role> {
        self.inner.read().roles.get(&id).cloned()
    }

    /// List roles, active only unless `include_inactive`
    pub fn roles(&self, include_inactive: bool) -> Vec<Role> {
        self.inner
            .read()
            .roles
            .values()
            .filter(|r| include_inactive || r.is_active)
            .cloned()
            .collect()
    }

    /// True iff the role holds every action of the category.
    ///
    /// Unknown roles or categories answer false (fail closed).
    pub fn is_fully_selected(&self, role_id: i64, category_key: &str) -> bool {
        let Some(category) = self.catalog().category(category_key) else {
            return false;
        };
        let state = self.inner.read();
        let Some(role) = state.roles.get(&role_id) else {
            return false;
        };
        !category.actions.is_empty()
            && category
                .actions
                .iter()
                .all(|a| role.permissions.contains(&a.key))
    }

    /// True iff the role holds some but not all actions of the category
    /// (the indeterminate checkbox state).
    pub fn is_partially_selected(&self, role_id: i64, category_key: &str) -> bool {
        let Some(category) = self.catalog().category(category_key) else {
            return false;
        };
        let state = self.inner.read();
        let Some(role) = state.roles.get(&role_id) else {
            return false;
        };
        let selected = category
            .actions
            .iter()
            .filter(|a| role.permissions.contains(&a.key))
            .count();
        selected > 0 && selected < category.actions.len()
    }

    /// Grant coverage of a role across every catalog category.
    ///
    /// Evaluated under one read guard, so the result is a consistent
    /// snapshot even while mutations are in flight. Unknown roles map
    /// to `None` everywhere.
    pub fn category_grants(&self, role_id: i64) -> BTreeMap<String, CategoryGrant> {
        let state = self.inner.read();
        let role = state.roles.get(&role_id);
        self.catalog()
            .categories()
            .iter()
            .map(|category| {
                let grant = match role {
                    Some(role) if !category.actions.is_empty() => {
                        let selected = category
                            .actions
                            .iter()
                            .filter(|a| role.permissions.contains(&a.key))
                            .count();
                        if selected == 0 {
                            CategoryGrant::None
                        } else if selected == category.actions.len() {
                            CategoryGrant::Full
                        } else {
                            CategoryGrant::Partial
                        }
                    }
                    _ => CategoryGrant::None,
                };
                (category.key.clone(), grant)
            })
            .collect()
    }

    /// Bulk-grant or bulk-revoke every action of a category on a role.
    pub fn set_category_permissions(
        &self,
        role_id: i64,
        category_key: &str,
        granted: bool,
    ) -> AppResult<Role> {
        let category = self
            .catalog()
            .category(category_key)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::NotFound,
                    format!("Permission category '{category_key}' not found"),
                )
            })?
            .clone();

        let mut state = self.inner.write();
        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| role_not_found(role_id))?;
        if role.is_system {
            return Err(system_role_rejected(&role.name));
        }

        if granted {
            role.permissions
                .extend(category.actions.iter().map(|a| a.key.clone()));
        } else {
            for action in &category.actions {
                role.permissions.remove(&action.key);
            }
        }
        Ok(role.clone())
    }

    /// Validate a permission list against the catalog and collapse it
    /// into a set.
    fn checked_permission_set(
        &self,
        keys: &[PermissionKey],
    ) -> AppResult<BTreeSet<PermissionKey>> {
        for key in keys {
            if !self.catalog().contains(key) {
                return Err(AppError::with_message(
                    ErrorCode::UnknownPermission,
                    format!("Unknown permission: {key}"),
                )
                .with_detail("permission", key.to_string()));
            }
        }
        Ok(keys.iter().cloned().collect())
    }

    /// Insert a system role directly. Only the seeding path may mint
    /// system roles; keys are assumed to come from the catalog.
    pub(crate) fn insert_system_role(
        &self,
        name: &str,
        description: &str,
        permissions: BTreeSet<PermissionKey>,
    ) -> Role {
        let mut state = self.inner.write();
        let id = state.next_role_id;
        state.next_role_id += 1;

        let role = Role {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
            permissions,
            is_system: true,
            is_active: true,
            user_count: 0,
        };
        state.roles.insert(id, role.clone());
        role
    }

    // ===== Rollback hooks (storage write failed after apply) =====
    //
    // Snapshots are taken outside the lock, so by the time a rollback
    // runs other mutations may have landed. `user_count` is live data
    // owned by the user records; a restore always recounts it instead
    // of trusting the snapshot.

    pub(crate) fn remove_role_unchecked(&self, id: i64) {
        self.inner.write().roles.remove(&id);
    }

    pub(crate) fn restore_role(&self, mut role: Role) {
        let mut state = self.inner.write();
        let id = role.id;
        let name = role.name.clone();
        role.user_count = state.users.values().filter(|u| u.role_id == id).count() as u32;
        state.roles.insert(id, role);
        for user in state.users.values_mut().filter(|u| u.role_id == id) {
            user.role = name.clone();
        }
    }
}

fn role_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RoleNotFound, format!("Role {id} not found"))
}

fn system_role_rejected(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::RoleIsSystem,
        format!("Cannot modify system role '{name}'"),
    )
}

fn check_name_available(state: &AccessState, name: &str, except: Option<i64>) -> AppResult<()> {
    let taken = state
        .roles
        .values()
        .any(|r| r.is_active && Some(r.id) != except && r.name == name);
    if taken {
        return Err(AppError::with_message(
            ErrorCode::RoleNameExists,
            format!("Role name '{name}' already exists"),
        ));
    }
    Ok(())
}
