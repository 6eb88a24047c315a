//! System user operations
//!
//! Every mutation keeps role aggregates consistent: `user_count`
//! adjustments are keyed by role id (never by the denormalized name)
//! and happen in the same critical section as the user change, so
//! reassignment moves both counters atomically or not at all.

use super::AccessStore;
use chrono::Utc;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{SystemUser, UserCreate, UserUpdate};

impl AccessStore {
    /// Create a system user assigned to an existing role.
    ///
    /// Increments the target role's `user_count` and denormalizes the
    /// role display name onto the user record.
    pub fn create_user(&self, data: UserCreate) -> AppResult<SystemUser> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("User name is required").with_detail("field", "name"));
        }
        let email = data.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(
                AppError::validation("A valid email is required").with_detail("field", "email")
            );
        }

        let mut state = self.inner.write();
        if state.users.values().any(|u| u.email == email) {
            return Err(AppError::with_message(
                ErrorCode::UserEmailExists,
                format!("Email '{email}' already exists"),
            ));
        }
        let role = state
            .roles
            .get_mut(&data.role_id)
            .ok_or_else(|| role_not_found(data.role_id))?;
        role.user_count += 1;
        let role_name = role.name.clone();

        let id = state.next_user_id;
        state.next_user_id += 1;

        let user = SystemUser {
            id,
            name,
            email,
            role_id: data.role_id,
            role: role_name,
            is_active: data.is_active.unwrap_or(true),
            last_login: None,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    /// Update a user. Role reassignment decrements the old role's
    /// count and increments the new one in a single step; if the new
    /// role does not exist, nothing changes.
    pub fn update_user(&self, id: i64, data: UserUpdate) -> AppResult<SystemUser> {
        let name = match data.name {
            Some(raw) => {
                let name = raw.trim().to_string();
                if name.is_empty() {
                    return Err(
                        AppError::validation("User name is required").with_detail("field", "name")
                    );
                }
                Some(name)
            }
            None => None,
        };
        let email = match data.email {
            Some(raw) => {
                let email = raw.trim().to_lowercase();
                if email.is_empty() || !email.contains('@') {
                    return Err(AppError::validation("A valid email is required")
                        .with_detail("field", "email"));
                }
                Some(email)
            }
            None => None,
        };

        let mut state = self.inner.write();
        let current = state.users.get(&id).ok_or_else(|| user_not_found(id))?;
        let old_role_id = current.role_id;

        if let Some(ref email) = email {
            if state.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::with_message(
                    ErrorCode::UserEmailExists,
                    format!("Email '{email}' already exists"),
                ));
            }
        }

        // Validate the reassignment target before touching anything
        let new_role_name = match data.role_id {
            Some(new_role_id) if new_role_id != old_role_id => Some((
                new_role_id,
                state
                    .roles
                    .get(&new_role_id)
                    .ok_or_else(|| role_not_found(new_role_id))?
                    .name
                    .clone(),
            )),
            _ => None,
        };

        if let Some((new_role_id, _)) = &new_role_name {
            // Counts move by role id, both sides in this one critical
            // section.
            if let Some(old_role) = state.roles.get_mut(&old_role_id) {
                old_role.user_count = old_role.user_count.saturating_sub(1);
            }
            if let Some(new_role) = state.roles.get_mut(new_role_id) {
                new_role.user_count += 1;
            }
        }

        let user = state.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some((new_role_id, role_name)) = new_role_name {
            user.role_id = new_role_id;
            user.role = role_name;
        }
        if let Some(is_active) = data.is_active {
            user.is_active = is_active;
        }
        Ok(user.clone())
    }

    /// Delete a user and release their role slot. Returns the removed
    /// record.
    pub fn delete_user(&self, id: i64) -> AppResult<SystemUser> {
        let mut state = self.inner.write();
        let user = state.users.remove(&id).ok_or_else(|| user_not_found(id))?;
        if let Some(role) = state.roles.get_mut(&user.role_id) {
            role.user_count = role.user_count.saturating_sub(1);
        }
        Ok(user)
    }

    /// Record a successful login
    pub fn touch_last_login(&self, id: i64) -> AppResult<SystemUser> {
        let mut state = self.inner.write();
        let user = state.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        user.last_login = Some(Utc::now());
        Ok(user.clone())
    }

    /// Look up a user by id
    pub fn user(&self, id: i64) -> Option<SystemUser> {
        self.inner.read().users.get(&id).cloned()
    }

    /// List all users
    pub fn users(&self) -> Vec<SystemUser> {
        self.inner.read().users.values().cloned().collect()
    }

    /// List users assigned to a role
    pub fn users_by_role(&self, role_id: i64) -> Vec<SystemUser> {
        self.inner
            .read()
            .users
            .values()
            .filter(|u| u.role_id == role_id)
            .cloned()
            .collect()
    }

    // ===== Rollback hooks (storage write failed after apply) =====

    pub(crate) fn remove_user_unchecked(&self, id: i64) {
        let mut state = self.inner.write();
        if let Some(user) = state.users.remove(&id) {
            if let Some(role) = state.roles.get_mut(&user.role_id) {
                role.user_count = role.user_count.saturating_sub(1);
            }
        }
    }

    pub(crate) fn restore_user(&self, snapshot: SystemUser) {
        let mut state = self.inner.write();
        let restored_role_id = snapshot.role_id;
        let displaced = state.users.insert(snapshot.id, snapshot);

        // Counts are live data; rebuild them from the user records for
        // every role this restore touched (see the note on the role
        // rollback hooks).
        let mut touched = vec![restored_role_id];
        if let Some(displaced) = displaced {
            if displaced.role_id != restored_role_id {
                touched.push(displaced.role_id);
            }
        }
        for role_id in touched {
            let count = state.users.values().filter(|u| u.role_id == role_id).count() as u32;
            if let Some(role) = state.roles.get_mut(&role_id) {
                role.user_count = count;
            }
        }
    }
}

fn role_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RoleNotFound, format!("Role {id} not found"))
}

fn user_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PermissionCatalog;
    use shared::models::{PermissionKey, Role, RoleCreate};
    use std::sync::Arc;

    fn key(raw: &str) -> PermissionKey {
        PermissionKey::parse(raw).unwrap()
    }

    fn store() -> AccessStore {
        AccessStore::new(Arc::new(PermissionCatalog::builtin()))
    }

    fn create_role(store: &AccessStore, name: &str) -> Role {
        store
            .create_role(RoleCreate {
                name: name.to_string(),
                description: None,
                permissions: vec![key("billing.view")],
                is_active: None,
            })
            .unwrap()
    }

    fn create_user(store: &AccessStore, name: &str, role_id: i64) -> SystemUser {
        store
            .create_user(UserCreate {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                role_id,
                is_active: None,
            })
            .unwrap()
    }

    #[test]
    fn test_create_user_increments_count_and_denormalizes_name() {
        let store = store();
        let role = create_role(&store, "Cashier");

        let user = create_user(&store, "Mike", role.id);
        assert_eq!(user.role, "Cashier");
        assert!(user.last_login.is_none());
        assert_eq!(store.role(role.id).unwrap().user_count, 1);
    }

    #[test]
    fn test_create_user_unknown_role() {
        let store = store();
        let err = store
            .create_user(UserCreate {
                name: "Mike".into(),
                email: "mike@example.com".into(),
                role_id: 42,
                is_active: None,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
    }

    #[test]
    fn test_create_user_rejects_duplicate_email() {
        let store = store();
        let role = create_role(&store, "Cashier");
        create_user(&store, "Mike", role.id);

        let err = store
            .create_user(UserCreate {
                name: "Mike Again".into(),
                email: "MIKE@example.com".into(), // email is normalized
                role_id: role.id,
                is_active: None,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserEmailExists);
    }

    #[test]
    fn test_reassignment_moves_both_counts() {
        let store = store();
        let cashier = create_role(&store, "Cashier");
        let manager = create_role(&store, "Manager");
        let user = create_user(&store, "Mike", cashier.id);

        let updated = store
            .update_user(
                user.id,
                UserUpdate {
                    role_id: Some(manager.id),
                    ..UserUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.role_id, manager.id);
        assert_eq!(updated.role, "Manager");
        assert_eq!(store.role(cashier.id).unwrap().user_count, 0);
        assert_eq!(store.role(manager.id).unwrap().user_count, 1);
    }

    #[test]
    fn test_reassignment_to_missing_role_changes_nothing() {
        let store = store();
        let cashier = create_role(&store, "Cashier");
        let user = create_user(&store, "Mike", cashier.id);

        let err = store
            .update_user(
                user.id,
                UserUpdate {
                    name: Some("Michael".into()),
                    role_id: Some(42),
                    ..UserUpdate::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);

        // Fully failed: neither the name nor the counts moved
        let unchanged = store.user(user.id).unwrap();
        assert_eq!(unchanged.name, "Mike");
        assert_eq!(unchanged.role_id, cashier.id);
        assert_eq!(store.role(cashier.id).unwrap().user_count, 1);
    }

    #[test]
    fn test_reassignment_to_same_role_keeps_count() {
        let store = store();
        let cashier = create_role(&store, "Cashier");
        let user = create_user(&store, "Mike", cashier.id);

        store
            .update_user(
                user.id,
                UserUpdate {
                    role_id: Some(cashier.id),
                    ..UserUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(store.role(cashier.id).unwrap().user_count, 1);
    }

    #[test]
    fn test_delete_user_decrements_count() {
        let store = store();
        let role = create_role(&store, "Cashier");
        let user = create_user(&store, "Mike", role.id);

        store.delete_user(user.id).unwrap();
        assert_eq!(store.role(role.id).unwrap().user_count, 0);

        let err = store.delete_user(user.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[test]
    fn test_role_delete_lifecycle_scenario() {
        // Full lifecycle: create role, assign user, delete is
        // blocked with the live count, then allowed once freed.
        let store = store();
        let role = store
            .create_role(RoleCreate {
                name: "Sales Staff".into(),
                description: None,
                permissions: vec![
                    key("billing.view"),
                    key("billing.create"),
                    key("customers.view"),
                ],
                is_active: None,
            })
            .unwrap();
        assert_eq!(role.user_count, 0);
        assert!(!role.is_system);

        let user = create_user(&store, "Mike", role.id);
        assert_eq!(store.role(role.id).unwrap().user_count, 1);

        let err = store.delete_role(role.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleInUse);
        assert!(err.message.contains("1 users assigned"), "{}", err.message);

        store.delete_user(user.id).unwrap();
        assert_eq!(store.role(role.id).unwrap().user_count, 0);
        store.delete_role(role.id).unwrap();
    }

    #[test]
    fn test_users_by_role() {
        let store = store();
        let cashier = create_role(&store, "Cashier");
        let manager = create_role(&store, "Manager");
        create_user(&store, "Mike", cashier.id);
        create_user(&store, "Ana", cashier.id);
        create_user(&store, "Lena", manager.id);

        let cashiers = store.users_by_role(cashier.id);
        assert_eq!(cashiers.len(), 2);
        assert!(cashiers.iter().all(|u| u.role_id == cashier.id));
        assert!(store.users_by_role(999).is_empty());
    }

    #[test]
    fn test_touch_last_login() {
        let store = store();
        let role = create_role(&store, "Cashier");
        let user = create_user(&store, "Mike", role.id);

        let touched = store.touch_last_login(user.id).unwrap();
        assert!(touched.last_login.is_some());

        let err = store.touch_last_login(999).unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[test]
    fn test_restore_user_recounts_touched_roles() {
        let store = store();
        let a = create_role(&store, "A");
        let b = create_role(&store, "B");
        let user = create_user(&store, "Mike", a.id);
        let snapshot = store.user(user.id).unwrap();

        store
            .update_user(
                user.id,
                UserUpdate {
                    role_id: Some(b.id),
                    ..UserUpdate::default()
                },
            )
            .unwrap();

        // Restoring the pre-reassignment snapshot rebuilds both
        // counts from the user records.
        store.restore_user(snapshot);
        assert_eq!(store.user(user.id).unwrap().role_id, a.id);
        assert_eq!(store.role(a.id).unwrap().user_count, 1);
        assert_eq!(store.role(b.id).unwrap().user_count, 0);
    }

    #[test]
    fn test_counts_stay_consistent_over_mixed_mutations() {
        let store = store();
        let a = create_role(&store, "A");
        let b = create_role(&store, "B");

        let u1 = create_user(&store, "U1", a.id);
        let u2 = create_user(&store, "U2", a.id);
        let u3 = create_user(&store, "U3", b.id);

        store
            .update_user(
                u1.id,
                UserUpdate {
                    role_id: Some(b.id),
                    ..UserUpdate::default()
                },
            )
            .unwrap();
        store.delete_user(u2.id).unwrap();
        store
            .update_user(
                u3.id,
                UserUpdate {
                    role_id: Some(a.id),
                    ..UserUpdate::default()
                },
            )
            .unwrap();

        // Recompute from the user records and compare
        for role_id in [a.id, b.id] {
            let expected = store.users_by_role(role_id).len() as u32;
            assert_eq!(store.role(role_id).unwrap().user_count, expected);
        }
    }
}
