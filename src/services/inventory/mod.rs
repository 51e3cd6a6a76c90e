//! Inventory service
//!
//! Transfers, stand orders and sales all change stock. Each operation runs in
//! one transaction: header and detail rows are written, the stock effect is
//! collected in a [`StockLedger`] and applied with row locks, and any error
//! drops the transaction before commit.

pub mod ledger;
pub mod stock;
mod order;
mod sale;
mod transfer;

pub use ledger::{plan_lines, LinePlan, StockChange, StockLedger, StockLocation};

use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct InventoryService {
    pool: PgPool,
    low_stock_threshold: i64,
}

impl InventoryService {
    pub fn new(pool: PgPool, low_stock_threshold: i64) -> Self {
        Self {
            pool,
            low_stock_threshold,
        }
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }
}
