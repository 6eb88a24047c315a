//! In-memory storage, for tests and ephemeral deployments

use super::{AccessStorage, StorageResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{Role, SystemUser};
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryStorage {
    roles: Mutex<BTreeMap<i64, Role>>,
    users: Mutex<BTreeMap<i64, SystemUser>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessStorage for MemoryStorage {
    async fn load_roles(&self) -> StorageResult<Vec<Role>> {
        Ok(self.roles.lock().values().cloned().collect())
    }

    async fn save_role(&self, role: &Role) -> StorageResult<()> {
        self.roles.lock().insert(role.id, role.clone());
        Ok(())
    }

    async fn delete_role(&self, id: i64) -> StorageResult<()> {
        self.roles.lock().remove(&id);
        Ok(())
    }

    async fn load_users(&self) -> StorageResult<Vec<SystemUser>> {
        Ok(self.users.lock().values().cloned().collect())
    }

    async fn save_user(&self, user: &SystemUser) -> StorageResult<()> {
        self.users.lock().insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> StorageResult<()> {
        self.users.lock().remove(&id);
        Ok(())
    }
}
