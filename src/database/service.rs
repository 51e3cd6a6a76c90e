//! Database service layer
//!
//! Bundles every repository around one connection pool

use crate::database::{
    CrudRepository, DatabasePool, ImageRepository, NotificationRepository, OrderRepository, RaffleRepository,
    ReportRepository, Resource, RoleRepository, SaleRepository, StandRepository,
    TransferRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub roles: RoleRepository,
    pub stands: StandRepository,
    pub raffles: RaffleRepository,
    pub notifications: NotificationRepository,
    pub reports: ReportRepository,
    pub transfers: TransferRepository,
    pub orders: OrderRepository,
    pub sales: SaleRepository,
    pub images: ImageRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool.clone()),
            stands: StandRepository::new(pool.clone()),
            raffles: RaffleRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            reports: ReportRepository::new(pool.clone()),
            transfers: TransferRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            sales: SaleRepository::new(pool.clone()),
            images: ImageRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Generic CRUD access for any [`Resource`]
    pub fn crud<T: Resource>(&self) -> CrudRepository<T> {
        CrudRepository::new(self.pool.clone())
    }

    pub async fn health_check(&self) -> bool {
        super::health_check(&self.pool).await.is_ok()
    }
}
