//! Core server plumbing: configuration, shared state, HTTP bootstrap

mod config;
mod server;
mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
