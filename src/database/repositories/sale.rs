//! Sale (`venta`) persistence

use sqlx::{PgConnection, PgPool};

use super::lines::group_by_parent;
use crate::models::{line_subtotal, Sale, SaleLine, SaleRequest, SaleWithLines, ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::errors::Result;

const SALE_COLUMNS: &str =
    "id, stand_id, voluntario_id, sold_at, total_cents, estado, created_at, updated_at";
const SALE_LINE_COLUMNS: &str =
    "id, venta_id, producto_id, quantity, unit_price_cents, subtotal_cents";

#[derive(Clone, Debug)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SaleWithLines>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(sales).await
    }

    pub async fn list_active(&self) -> Result<Vec<SaleWithLines>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas WHERE estado = $1 ORDER BY id"
        ))
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(sales).await
    }

    pub async fn by_stand(&self, stand_id: i64) -> Result<Vec<SaleWithLines>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas WHERE stand_id = $1 ORDER BY sold_at DESC, id DESC"
        ))
        .bind(stand_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(sales).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<SaleWithLines>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match sale {
            Some(sale) => Ok(self.with_lines(vec![sale]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn with_lines(&self, sales: Vec<Sale>) -> Result<Vec<SaleWithLines>> {
        let ids: Vec<i64> = sales.iter().map(|s| s.id).collect();
        let lines = sqlx::query_as::<_, SaleLine>(&format!(
            "SELECT {SALE_LINE_COLUMNS} FROM detalle_ventas WHERE venta_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        let mut grouped = group_by_parent(lines, |line| line.venta_id);

        Ok(sales
            .into_iter()
            .map(|sale| SaleWithLines {
                detalles: grouped.remove(&sale.id).unwrap_or_default(),
                sale,
            })
            .collect())
    }

    pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(sale)
    }

    pub async fn lines(conn: &mut PgConnection, id: i64) -> Result<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(&format!(
            "SELECT {SALE_LINE_COLUMNS} FROM detalle_ventas WHERE venta_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(conn)
        .await?;

        Ok(lines)
    }

    pub async fn insert(conn: &mut PgConnection, request: &SaleRequest) -> Result<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO ventas (stand_id, voluntario_id, sold_at)
            VALUES ($1, $2, COALESCE($3, NOW()))
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(request.stand_id)
        .bind(request.voluntario_id)
        .bind(request.sold_at)
        .fetch_one(conn)
        .await?;

        Ok(sale)
    }

    pub async fn update_header(conn: &mut PgConnection, id: i64, request: &SaleRequest) -> Result<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE ventas
            SET stand_id = $2,
                voluntario_id = COALESCE($3, voluntario_id),
                sold_at = COALESCE($4, sold_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.stand_id)
        .bind(request.voluntario_id)
        .bind(request.sold_at)
        .fetch_one(conn)
        .await?;

        Ok(sale)
    }

    pub async fn insert_line(
        conn: &mut PgConnection,
        venta_id: i64,
        producto_id: i64,
        quantity: i64,
        unit_price_cents: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO detalle_ventas (venta_id, producto_id, quantity, unit_price_cents, subtotal_cents)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(venta_id)
        .bind(producto_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(line_subtotal(quantity, unit_price_cents)?)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn update_line(
        conn: &mut PgConnection,
        id: i64,
        producto_id: i64,
        quantity: i64,
        unit_price_cents: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE detalle_ventas
            SET producto_id = $2, quantity = $3, unit_price_cents = $4, subtotal_cents = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(producto_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(line_subtotal(quantity, unit_price_cents)?)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn delete_lines(conn: &mut PgConnection, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM detalle_ventas WHERE id = ANY($1)")
            .bind(ids)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Recompute `total_cents` from the current lines
    pub async fn refresh_total(conn: &mut PgConnection, id: i64) -> Result<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE ventas
            SET total_cents = (
                    SELECT COALESCE(SUM(subtotal_cents), 0)::BIGINT FROM detalle_ventas WHERE venta_id = $1
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(conn)
        .await?;

        Ok(sale)
    }

    pub async fn deactivate(conn: &mut PgConnection, id: i64) -> Result<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "UPDATE ventas SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING {SALE_COLUMNS}"
        ))
        .bind(id)
        .bind(ESTADO_INACTIVO)
        .fetch_one(conn)
        .await?;

        Ok(sale)
    }
}
