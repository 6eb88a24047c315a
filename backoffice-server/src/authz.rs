//! Authorization query engine
//!
//! Read-side companion to the store: answers "may this user do X"
//! and summarizes a role's coverage per category. Every answer fails
//! closed: unknown users, roles, keys or malformed input all come back
//! as a denial, never an error.

use crate::catalog::PermissionCatalog;
use crate::store::AccessStore;
use shared::models::{CategoryGrant, PermissionKey};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Cheap-to-clone handle for authorization checks
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<AccessStore>,
}

impl Authorizer {
    pub fn new(store: Arc<AccessStore>) -> Self {
        Self { store }
    }

    /// Whether the user's role grants the permission.
    ///
    /// Denies for unknown users, unknown roles and malformed keys.
    pub fn user_has_permission(&self, user_id: i64, permission: &str) -> bool {
        let Ok(key) = PermissionKey::parse(permission) else {
            return false;
        };
        self.user_has_permission_key(user_id, &key)
    }

    /// Typed variant for callers that already hold a parsed key
    pub fn user_has_permission_key(&self, user_id: i64, key: &PermissionKey) -> bool {
        let Some(user) = self.store.user(user_id) else {
            return false;
        };
        self.role_has_permission_key(user.role_id, key)
    }

    /// Whether the role grants the permission
    pub fn role_has_permission(&self, role_id: i64, permission: &str) -> bool {
        let Ok(key) = PermissionKey::parse(permission) else {
            return false;
        };
        self.role_has_permission_key(role_id, &key)
    }

    pub fn role_has_permission_key(&self, role_id: i64, key: &PermissionKey) -> bool {
        match self.store.role(role_id) {
            Some(role) => role.has_permission(key),
            None => false,
        }
    }

    /// Per-category coverage of a role over the whole catalog.
    ///
    /// Every catalog category appears in the result; unknown roles map
    /// to `None` everywhere. The store evaluates all categories under
    /// one read guard, so the summary is a consistent snapshot.
    pub fn summarize_role_permissions(&self, role_id: i64) -> BTreeMap<String, CategoryGrant> {
        self.store.category_grants(role_id)
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        self.store.catalog()
    }

    pub fn store(&self) -> &AccessStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{RoleCreate, UserCreate};

    fn key(raw: &str) -> PermissionKey {
        PermissionKey::parse(raw).unwrap()
    }

    fn setup() -> (Authorizer, i64, i64) {
        let store = Arc::new(AccessStore::new(Arc::new(PermissionCatalog::builtin())));
        let role = store
            .create_role(RoleCreate {
                name: "Sales Staff".into(),
                description: None,
                permissions: vec![
                    key("inventory.view"),
                    key("inventory.create"),
                    key("inventory.edit"),
                    key("customers.view"),
                ],
                is_active: None,
            })
            .unwrap();
        let user = store
            .create_user(UserCreate {
                name: "Mike".into(),
                email: "mike@example.com".into(),
                role_id: role.id,
                is_active: None,
            })
            .unwrap();
        (Authorizer::new(store), role.id, user.id)
    }

    #[test]
    fn test_user_check_matches_role_check() {
        let (authz, role_id, user_id) = setup();

        for raw in ["inventory.view", "billing.view", "inventory.delete"] {
            assert_eq!(
                authz.user_has_permission(user_id, raw),
                authz.role_has_permission(role_id, raw),
                "mismatch for {raw}"
            );
        }
        assert!(authz.user_has_permission(user_id, "inventory.view"));
        assert!(!authz.user_has_permission(user_id, "billing.view"));
    }

    #[test]
    fn test_fails_closed() {
        let (authz, role_id, user_id) = setup();

        // unknown user / role
        assert!(!authz.user_has_permission(999, "inventory.view"));
        assert!(!authz.role_has_permission(999, "inventory.view"));

        // malformed keys
        assert!(!authz.user_has_permission(user_id, "inventory"));
        assert!(!authz.user_has_permission(user_id, ""));
        assert!(!authz.role_has_permission(role_id, "Inventory.View"));

        // well-formed but not in any role
        assert!(!authz.user_has_permission(user_id, "inventory.fly"));
    }

    #[test]
    fn test_summary_covers_every_category() {
        let (authz, role_id, _) = setup();
        let summary = authz.summarize_role_permissions(role_id);

        assert_eq!(summary.len(), authz.catalog().categories().len());

        // 3 of 5 inventory actions granted
        assert_eq!(summary["inventory"], CategoryGrant::Partial);
        // 0 of 4 billing actions granted
        assert_eq!(summary["billing"], CategoryGrant::None);

        // grant all of customers and the summary flips to Full
        authz
            .store()
            .set_category_permissions(role_id, "customers", true)
            .unwrap();
        let summary = authz.summarize_role_permissions(role_id);
        assert_eq!(summary["customers"], CategoryGrant::Full);
    }

    #[test]
    fn test_summary_for_unknown_role_is_all_none() {
        let (authz, _, _) = setup();
        let summary = authz.summarize_role_permissions(999);
        assert!(summary.values().all(|g| *g == CategoryGrant::None));
    }
}
