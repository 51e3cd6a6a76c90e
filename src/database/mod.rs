//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod resources;
pub mod service;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{
    CrudRepository, ImageOwner, ImageRepository, NotificationRepository, OrderRepository, RaffleRepository, ReportRepository,
    Resource, RoleRepository, SaleRepository, StandRepository, TransferRepository, UserRepository,
};
pub use service::DatabaseService;
