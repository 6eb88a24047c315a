//! Shared types for the back-office framework
//!
//! Common types used across crates: the unified error system,
//! data models, and API response structures.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
