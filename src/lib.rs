//! Colecta
//!
//! REST backend for an NGO: people, volunteers, events and their stands,
//! a product catalogue with warehouse and per-stand stock, transfers,
//! stand orders, sales, raffles with ticket books, and notifications.

#![allow(non_snake_case)]

pub mod app;
pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ColectaError, Result};

// Re-export main components for easy access
pub use app::{build_router, AppState};
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
