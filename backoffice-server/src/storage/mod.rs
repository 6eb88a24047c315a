//! Persistence collaborator
//!
//! The store works purely in memory; a storage backend is notified of
//! mutations and asked for the full data set at startup. Backends must
//! be durable per call, so a crash loses at most the mutation in
//! flight.

mod json;
mod memory;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use shared::error::AppError;
use shared::models::{Role, SystemUser};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage(err.to_string())
    }
}

/// Durable backend for roles and system users
#[async_trait]
pub trait AccessStorage: Send + Sync {
    async fn load_roles(&self) -> StorageResult<Vec<Role>>;
    async fn save_role(&self, role: &Role) -> StorageResult<()>;
    async fn delete_role(&self, id: i64) -> StorageResult<()>;

    async fn load_users(&self) -> StorageResult<Vec<SystemUser>>;
    async fn save_user(&self, user: &SystemUser) -> StorageResult<()>;
    async fn delete_user(&self, id: i64) -> StorageResult<()>;
}
