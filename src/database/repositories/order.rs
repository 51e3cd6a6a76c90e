//! Stand order (`pedido`) persistence

use sqlx::{PgConnection, PgPool};

use super::lines::{group_by_parent, LineTable};
use crate::models::{Order, OrderLine, OrderRequest, OrderWithLines, ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::errors::Result;

const ORDER_COLUMNS: &str = "id, stand_id, description, requested_at, estado, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<OrderWithLines>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM pedidos ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(orders).await
    }

    pub async fn list_active(&self) -> Result<Vec<OrderWithLines>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM pedidos WHERE estado = $1 ORDER BY id"
        ))
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(orders).await
    }

    pub async fn by_stand(&self, stand_id: i64) -> Result<Vec<OrderWithLines>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM pedidos WHERE stand_id = $1 ORDER BY requested_at DESC, id DESC"
        ))
        .bind(stand_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(orders).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<OrderWithLines>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM pedidos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match order {
            Some(order) => Ok(self.with_lines(vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn with_lines(&self, orders: Vec<Order>) -> Result<Vec<OrderWithLines>> {
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let lines: Vec<OrderLine> = LineTable::ORDERS.fetch(&self.pool, &ids).await?;
        let mut grouped = group_by_parent(lines, |line| line.pedido_id);

        Ok(orders
            .into_iter()
            .map(|order| OrderWithLines {
                detalles: grouped.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect())
    }

    pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM pedidos WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(order)
    }

    pub async fn lines(conn: &mut PgConnection, id: i64) -> Result<Vec<OrderLine>> {
        LineTable::ORDERS.fetch(conn, &[id]).await
    }

    pub async fn insert(conn: &mut PgConnection, request: &OrderRequest) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO pedidos (stand_id, description, requested_at)
            VALUES ($1, $2, COALESCE($3, NOW()))
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(request.stand_id)
        .bind(&request.description)
        .bind(request.requested_at)
        .fetch_one(conn)
        .await?;

        Ok(order)
    }

    pub async fn update_header(conn: &mut PgConnection, id: i64, request: &OrderRequest) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE pedidos
            SET stand_id = $2,
                description = COALESCE($3, description),
                requested_at = COALESCE($4, requested_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.stand_id)
        .bind(&request.description)
        .bind(request.requested_at)
        .fetch_one(conn)
        .await?;

        Ok(order)
    }

    pub async fn deactivate(conn: &mut PgConnection, id: i64) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE pedidos SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(ESTADO_INACTIVO)
        .fetch_one(conn)
        .await?;

        Ok(order)
    }
}
