//! System User Model
//!
//! Back-office operators, distinct from storefront customers and staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System user entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// The single role this user holds
    pub role_id: i64,
    /// Denormalized role display name, kept in sync with `role_id`
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role_id: i64,
    pub is_active: Option<bool>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i64>,
    pub is_active: Option<bool>,
}
