//! Role Model

use super::permission::PermissionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role entity (RBAC)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Granted permission actions (set semantics, no duplicates)
    pub permissions: BTreeSet<PermissionKey>,
    /// Built-in roles cannot be edited or deleted
    pub is_system: bool,
    pub is_active: bool,
    /// Derived: number of users currently assigned this role
    pub user_count: u32,
}

impl Role {
    /// Check whether this role grants a permission action
    pub fn has_permission(&self, key: &PermissionKey) -> bool {
        self.permissions.contains(key)
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<PermissionKey>,
    pub is_active: Option<bool>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<PermissionKey>>,
    pub is_active: Option<bool>,
}
