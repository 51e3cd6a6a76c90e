//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod inventory;
pub mod notification;
pub mod raffle;
pub mod redis;
pub mod uploads;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, Claims};
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use raffle::RaffleService;
pub use redis::RedisService;
pub use uploads::{ImageUpload, UploadService};
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::models::Notification;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub inventory_service: InventoryService,
    pub raffle_service: RaffleService,
    pub notification_service: NotificationService,
    pub upload_service: UploadService,
    pub redis_service: RedisService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: &DatabaseService) -> Result<Self> {
        let redis_service = RedisService::new(&settings.redis)?;

        let auth_service = AuthService::new(
            &settings.auth,
            db.users.clone(),
            db.roles.clone(),
            redis_service.clone(),
        );
        let user_service = UserService::new(db.users.clone(), auth_service.clone());
        let inventory_service =
            InventoryService::new(db.pool().clone(), settings.inventory.low_stock_threshold);
        let raffle_service = RaffleService::new(db.pool().clone(), db.raffles.clone());
        let notification_service =
            NotificationService::new(db.notifications.clone(), db.crud::<Notification>());
        let upload_service = UploadService::new(&settings.server, db.images.clone());

        Ok(Self {
            auth_service,
            user_service,
            inventory_service,
            raffle_service,
            notification_service,
            upload_service,
            redis_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            redis: self.redis_service.health_check().await,
        }
    }
}

/// Health status of optional backing services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHealthStatus {
    /// `None` when Redis is disabled
    pub redis: Option<bool>,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.redis.unwrap_or(true)
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.redis == Some(false) {
            issues.push("Redis connection failed".to_string());
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_redis_is_healthy() {
        let status = ServiceHealthStatus { redis: None };
        assert!(status.is_healthy());
        assert!(status.get_issues().is_empty());

        let status = ServiceHealthStatus { redis: Some(false) };
        assert!(!status.is_healthy());
        assert_eq!(status.get_issues().len(), 1);
    }
}
