//! Aggregate report rows

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sales of one stand within an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StandSalesRow {
    pub stand_id: i64,
    pub stand_name: String,
    pub sale_count: i64,
    pub total_cents: i64,
}

/// Stand inventory line valued at the current product price
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryValueRow {
    pub producto_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub value_cents: i64,
}
