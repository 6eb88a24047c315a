//! Role Store and User Directory
//!
//! One store object owns both collections behind a single lock.
//! User mutations touch role aggregates (`user_count`), so roles and
//! users must move together; every mutation runs in one critical
//! section and either fully applies or fully fails.
//!
//! The store is constructed explicitly and handed to collaborators;
//! there is no ambient singleton.

mod role;
mod user;

use crate::catalog::PermissionCatalog;
use parking_lot::RwLock;
use shared::models::{Role, SystemUser};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
struct AccessState {
    roles: BTreeMap<i64, Role>,
    users: BTreeMap<i64, SystemUser>,
    next_role_id: i64,
    next_user_id: i64,
}

/// In-memory access-control state: roles, users and their invariants
pub struct AccessStore {
    catalog: Arc<PermissionCatalog>,
    inner: RwLock<AccessState>,
}

impl AccessStore {
    /// Create an empty store
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        Self {
            catalog,
            inner: RwLock::new(AccessState {
                next_role_id: 1,
                next_user_id: 1,
                ..AccessState::default()
            }),
        }
    }

    /// Load persisted state into a fresh store.
    ///
    /// Persisted data is reconciled rather than trusted:
    /// - permission keys not present in the catalog are dropped with a
    ///   warning, never treated as fatal;
    /// - users referencing a role that no longer exists are dropped
    ///   with a warning;
    /// - `user_count` is rebuilt from the actual user records.
    pub fn load(
        catalog: Arc<PermissionCatalog>,
        roles: Vec<Role>,
        users: Vec<SystemUser>,
    ) -> Self {
        let mut state = AccessState::default();

        for mut role in roles {
            role.permissions.retain(|key| {
                let known = catalog.contains(key);
                if !known {
                    tracing::warn!(
                        role = %role.name,
                        permission = %key,
                        "Dropping permission key not present in the catalog"
                    );
                }
                known
            });
            role.user_count = 0;
            state.next_role_id = state.next_role_id.max(role.id + 1);
            state.roles.insert(role.id, role);
        }

        for user in users {
            let Some(role) = state.roles.get_mut(&user.role_id) else {
                tracing::warn!(
                    user = %user.name,
                    role_id = user.role_id,
                    "Dropping user referencing unknown role"
                );
                continue;
            };
            role.user_count += 1;
            state.next_user_id = state.next_user_id.max(user.id + 1);
            state.users.insert(user.id, user);
        }

        state.next_role_id = state.next_role_id.max(1);
        state.next_user_id = state.next_user_id.max(1);

        Self {
            catalog,
            inner: RwLock::new(state),
        }
    }

    /// The catalog this store validates against
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Current (role, user) record counts
    pub fn counts(&self) -> (usize, usize) {
        let state = self.inner.read();
        (state.roles.len(), state.users.len())
    }
}
