//! Row-level stock access used inside inventory transactions
//!
//! Every function takes the transaction's connection; the `lock_*`
//! functions hold `FOR UPDATE` locks until commit or rollback.

use sqlx::{FromRow, PgConnection};

use crate::models::ESTADO_ACTIVO;
use crate::utils::errors::Result;

/// Current quantity of a product at one location
#[derive(Debug, Clone, FromRow)]
pub struct StockRow {
    pub quantity: i64,
    pub product_name: String,
}

/// Active product data needed to price and validate detail lines
#[derive(Debug, Clone, FromRow)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
}

pub async fn lock_warehouse(conn: &mut PgConnection, producto_id: i64) -> Result<Option<StockRow>> {
    let row = sqlx::query_as::<_, StockRow>(
        "SELECT stock AS quantity, name AS product_name FROM productos WHERE id = $1 FOR UPDATE",
    )
    .bind(producto_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn set_warehouse(conn: &mut PgConnection, producto_id: i64, stock: i64) -> Result<()> {
    sqlx::query("UPDATE productos SET stock = $2, updated_at = NOW() WHERE id = $1")
        .bind(producto_id)
        .bind(stock)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn lock_stand(
    conn: &mut PgConnection,
    stand_id: i64,
    producto_id: i64,
) -> Result<Option<StockRow>> {
    let row = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT dp.quantity, p.name AS product_name
        FROM detalle_productos dp
        JOIN productos p ON p.id = dp.producto_id
        WHERE dp.stand_id = $1 AND dp.producto_id = $2
        FOR UPDATE OF dp
        "#,
    )
    .bind(stand_id)
    .bind(producto_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Make sure the stand has an active inventory row for the product
pub async fn ensure_stand_row(conn: &mut PgConnection, stand_id: i64, producto_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO detalle_productos (stand_id, producto_id, quantity)
        VALUES ($1, $2, 0)
        ON CONFLICT (stand_id, producto_id)
        DO UPDATE SET estado = $3, updated_at = NOW()
        WHERE detalle_productos.estado <> $3
        "#,
    )
    .bind(stand_id)
    .bind(producto_id)
    .bind(ESTADO_ACTIVO)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn set_stand(
    conn: &mut PgConnection,
    stand_id: i64,
    producto_id: i64,
    quantity: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE detalle_productos
        SET quantity = $3, updated_at = NOW()
        WHERE stand_id = $1 AND producto_id = $2
        "#,
    )
    .bind(stand_id)
    .bind(producto_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    Ok(())
}

/// Active products among `ids`
pub async fn active_products(conn: &mut PgConnection, ids: &[i64]) -> Result<Vec<ProductRef>> {
    let products = sqlx::query_as::<_, ProductRef>(
        "SELECT id, name, price_cents FROM productos WHERE id = ANY($1) AND estado = $2",
    )
    .bind(ids)
    .bind(ESTADO_ACTIVO)
    .fetch_all(conn)
    .await?;

    Ok(products)
}

/// Whether the stand exists and is active
pub async fn stand_is_active(conn: &mut PgConnection, stand_id: i64) -> Result<bool> {
    let row: Option<(i16,)> = sqlx::query_as("SELECT estado FROM stands WHERE id = $1")
        .bind(stand_id)
        .fetch_optional(conn)
        .await?;

    Ok(matches!(row, Some((estado,)) if estado == ESTADO_ACTIVO))
}
