//! Back-Office Access Control Server
//!
//! Role-based permission management for the retail/restaurant
//! back-office: a static permission catalog, role and system-user
//! stores, and the authorization query engine on top of them.
//!
//! # Module structure
//!
//! ```text
//! backoffice-server/src/
//! ├── core/        # Config, state, server bootstrap
//! ├── catalog/     # Immutable permission catalog
//! ├── store/       # Role store + user directory (mutation protocol)
//! ├── authz.rs     # Authorization query engine
//! ├── storage/     # Persistence collaborator interface
//! ├── bootstrap.rs # Built-in system roles and seeding
//! └── api/         # HTTP routes and handlers
//! ```

pub mod api;
pub mod authz;
pub mod bootstrap;
pub mod catalog;
pub mod core;
pub mod storage;
pub mod store;

// Re-export public types
pub use authz::Authorizer;
pub use catalog::PermissionCatalog;
pub use crate::core::{Config, Server, ServerState};
pub use storage::{AccessStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::AccessStore;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Set up process environment: dotenv and tracing subscriber.
///
/// `RUST_LOG` controls the filter; defaults to `info`.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             __   ____  ______
   / __ )____ ______/ /__/ __ \/ __/ /_
  / __  / __ `/ ___/ //_/ / / / /_/ __/
 / /_/ / /_/ / /__/ ,< / /_/ / __/ /_
/_____/\__,_/\___/_/|_|\____/_/  \__/
    "#
    );
}
