//! Read-only aggregate queries

use sqlx::PgPool;

use crate::models::{InventoryValueRow, Product, StandSalesRow, ESTADO_ACTIVO};
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active sales of each stand of an event; stands without sales report zero
    pub async fn event_sales(&self, evento_id: i64) -> Result<Vec<StandSalesRow>> {
        let rows = sqlx::query_as::<_, StandSalesRow>(
            r#"
            SELECT s.id AS stand_id,
                   s.name AS stand_name,
                   COUNT(v.id) AS sale_count,
                   COALESCE(SUM(v.total_cents), 0)::BIGINT AS total_cents
            FROM stands s
            LEFT JOIN ventas v ON v.stand_id = s.id AND v.estado = $2
            WHERE s.evento_id = $1
            GROUP BY s.id, s.name
            ORDER BY s.id
            "#,
        )
        .bind(evento_id)
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Stand inventory valued at current product prices
    pub async fn stand_inventory_value(&self, stand_id: i64) -> Result<Vec<InventoryValueRow>> {
        let rows = sqlx::query_as::<_, InventoryValueRow>(
            r#"
            SELECT dp.producto_id,
                   p.name AS product_name,
                   dp.quantity,
                   p.price_cents,
                   (dp.quantity * p.price_cents)::BIGINT AS value_cents
            FROM detalle_productos dp
            JOIN productos p ON p.id = dp.producto_id
            WHERE dp.stand_id = $1 AND dp.estado = $2
            ORDER BY p.name
            "#,
        )
        .bind(stand_id)
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Active products whose warehouse stock is at or below `threshold`
    pub async fn low_stock_products(&self, threshold: i64) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock, image_path, estado, created_at, updated_at
            FROM productos
            WHERE estado = $1 AND stock <= $2
            ORDER BY stock, name
            "#,
        )
        .bind(ESTADO_ACTIVO)
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
