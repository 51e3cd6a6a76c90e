//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod crud;
pub mod user;
pub mod role;
pub mod stand;
pub mod raffle;
pub mod notification;
pub mod report;
pub mod stock;
pub mod lines;
pub mod transfer;
pub mod order;
pub mod sale;
pub mod image;

// Re-export repositories
pub use crud::{CrudRepository, Resource};
pub use user::UserRepository;
pub use role::RoleRepository;
pub use stand::StandRepository;
pub use raffle::RaffleRepository;
pub use notification::NotificationRepository;
pub use report::ReportRepository;
pub use transfer::TransferRepository;
pub use order::OrderRepository;
pub use sale::SaleRepository;
pub use image::{ImageOwner, ImageRepository};
