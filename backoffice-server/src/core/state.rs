//! Shared server state
//!
//! `ServerState` owns the in-memory store, the authorizer and the
//! storage backend behind `Arc`s; handlers hold clones. Mutations go
//! through the service methods here, which apply in memory first and
//! then persist. If the storage write fails, the in-memory change is
//! rolled back so the two never diverge.

use crate::authz::Authorizer;
use crate::bootstrap;
use crate::catalog::PermissionCatalog;
use crate::core::Config;
use crate::storage::{AccessStorage, JsonFileStorage};
use crate::store::AccessStore;
use shared::error::AppResult;
use shared::models::{
    Role, RoleCreate, RoleUpdate, SystemUser, UserCreate, UserUpdate,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<AccessStore>,
    pub authz: Authorizer,
    storage: Arc<dyn AccessStorage>,
}

impl ServerState {
    /// Initialize with the default JSON file backend under `data_dir`
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let storage = JsonFileStorage::open(&config.data_dir).await?;
        Self::with_storage(config.clone(), Arc::new(storage)).await
    }

    /// Initialize with an explicit storage backend.
    ///
    /// Loads persisted state, reconciles it against the catalog and
    /// seeds the built-in system roles when the store is empty.
    pub async fn with_storage(
        config: Config,
        storage: Arc<dyn AccessStorage>,
    ) -> AppResult<Self> {
        let catalog = Arc::new(PermissionCatalog::builtin());
        let roles = storage.load_roles().await?;
        let users = storage.load_users().await?;
        let store = Arc::new(AccessStore::load(catalog, roles, users));

        let (role_count, user_count) = store.counts();
        if role_count == 0 {
            let seeded = bootstrap::seed_system_roles(&store);
            for role in &seeded {
                storage.save_role(role).await?;
            }
            tracing::info!(roles = seeded.len(), "Seeded built-in system roles");
        } else {
            tracing::info!(roles = role_count, users = user_count, "Loaded access state");
        }

        let authz = Authorizer::new(store.clone());
        Ok(Self {
            config,
            store,
            authz,
            storage,
        })
    }

    // ===== Role mutations =====

    pub async fn create_role(&self, data: RoleCreate) -> AppResult<Role> {
        let role = self.store.create_role(data)?;
        if let Err(err) = self.storage.save_role(&role).await {
            self.store.remove_role_unchecked(role.id);
            return Err(err.into());
        }
        Ok(role)
    }

    pub async fn update_role(&self, id: i64, data: RoleUpdate) -> AppResult<Role> {
        let snapshot = self.store.role(id);
        let role = self.store.update_role(id, data)?;
        if let Err(err) = self.storage.save_role(&role).await {
            if let Some(snapshot) = snapshot {
                self.store.restore_role(snapshot);
            }
            return Err(err.into());
        }
        Ok(role)
    }

    pub async fn delete_role(&self, id: i64) -> AppResult<Role> {
        let removed = self.store.delete_role(id)?;
        if let Err(err) = self.storage.delete_role(id).await {
            self.store.restore_role(removed);
            return Err(err.into());
        }
        Ok(removed)
    }

    pub async fn set_category_permissions(
        &self,
        role_id: i64,
        category_key: &str,
        granted: bool,
    ) -> AppResult<Role> {
        let snapshot = self.store.role(role_id);
        let role = self
            .store
            .set_category_permissions(role_id, category_key, granted)?;
        if let Err(err) = self.storage.save_role(&role).await {
            if let Some(snapshot) = snapshot {
                self.store.restore_role(snapshot);
            }
            return Err(err.into());
        }
        Ok(role)
    }

    // ===== User mutations =====
    //
    // `user_count` changes ride along in memory only; counts are
    // rebuilt from the user records at load time, so stale counts in
    // persisted role files are harmless.

    pub async fn create_user(&self, data: UserCreate) -> AppResult<SystemUser> {
        let user = self.store.create_user(data)?;
        if let Err(err) = self.storage.save_user(&user).await {
            self.store.remove_user_unchecked(user.id);
            return Err(err.into());
        }
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, data: UserUpdate) -> AppResult<SystemUser> {
        let snapshot = self.store.user(id);
        let user = self.store.update_user(id, data)?;
        if let Err(err) = self.storage.save_user(&user).await {
            if let Some(snapshot) = snapshot {
                self.store.restore_user(snapshot);
            }
            return Err(err.into());
        }
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<SystemUser> {
        let removed = self.store.delete_user(id)?;
        if let Err(err) = self.storage.delete_user(id).await {
            self.store.restore_user(removed);
            return Err(err.into());
        }
        Ok(removed)
    }

    pub async fn touch_last_login(&self, id: i64) -> AppResult<SystemUser> {
        let snapshot = self.store.user(id);
        let user = self.store.touch_last_login(id)?;
        if let Err(err) = self.storage.save_user(&user).await {
            if let Some(snapshot) = snapshot {
                self.store.restore_user(snapshot);
            }
            return Err(err.into());
        }
        Ok(user)
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        self.store.catalog()
    }
}
