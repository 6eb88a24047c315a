//! JSON file storage
//!
//! Two pretty-printed files under the data directory, `roles.json`
//! and `users.json`, each holding the full collection. Writes are
//! read-modify-write of the whole file behind an async mutex, which
//! is fine at back-office scale.

use super::{AccessStorage, StorageResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::models::{Role, SystemUser};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileStorage {
    roles_path: PathBuf,
    users_path: PathBuf,
    // One lock for both files; mutations are rare and tiny
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Open (or lazily create) storage under `data_dir`
    pub async fn open(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;
        Ok(Self {
            roles_path: data_dir.join("roles.json"),
            users_path: data_dir.join("users.json"),
            write_lock: Mutex::new(()),
        })
    }

    async fn read_all<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all<T: Serialize>(path: &Path, items: &[T]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn upsert_role(&self, role: &Role) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut roles: Vec<Role> = Self::read_all(&self.roles_path).await?;
        match roles.iter_mut().find(|r| r.id == role.id) {
            Some(slot) => *slot = role.clone(),
            None => roles.push(role.clone()),
        }
        Self::write_all(&self.roles_path, &roles).await
    }

    async fn upsert_user(&self, user: &SystemUser) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut users: Vec<SystemUser> = Self::read_all(&self.users_path).await?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => *slot = user.clone(),
            None => users.push(user.clone()),
        }
        Self::write_all(&self.users_path, &users).await
    }
}

#[async_trait]
impl AccessStorage for JsonFileStorage {
    async fn load_roles(&self) -> StorageResult<Vec<Role>> {
        Self::read_all(&self.roles_path).await
    }

    async fn save_role(&self, role: &Role) -> StorageResult<()> {
        self.upsert_role(role).await
    }

    async fn delete_role(&self, id: i64) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut roles: Vec<Role> = Self::read_all(&self.roles_path).await?;
        roles.retain(|r| r.id != id);
        Self::write_all(&self.roles_path, &roles).await
    }

    async fn load_users(&self) -> StorageResult<Vec<SystemUser>> {
        Self::read_all(&self.users_path).await
    }

    async fn save_user(&self, user: &SystemUser) -> StorageResult<()> {
        self.upsert_user(user).await
    }

    async fn delete_user(&self, id: i64) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut users: Vec<SystemUser> = Self::read_all(&self.users_path).await?;
        users.retain(|u| u.id != id);
        Self::write_all(&self.users_path, &users).await
    }
}
