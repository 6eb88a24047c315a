//! Data models
//!
//! Shared between backoffice-server and frontend (via API).
//! All IDs are `i64`, assigned sequentially by the store.

pub mod permission;
pub mod role;
pub mod user;

// Re-exports
pub use permission::*;
pub use role::*;
pub use user::*;
