//! Transfer (`traslado`) persistence

use sqlx::{PgConnection, PgPool};

use super::lines::{group_by_parent, LineTable};
use crate::models::{Transfer, TransferLine, TransferRequest, TransferWithLines, ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::errors::Result;

const TRANSFER_COLUMNS: &str =
    "id, kind, counterpart, description, transferred_at, estado, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TransferWithLines>> {
        let transfers = sqlx::query_as::<_, Transfer>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM traslados ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(transfers).await
    }

    pub async fn list_active(&self) -> Result<Vec<TransferWithLines>> {
        let transfers = sqlx::query_as::<_, Transfer>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM traslados WHERE estado = $1 ORDER BY id"
        ))
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        self.with_lines(transfers).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<TransferWithLines>> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM traslados WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match transfer {
            Some(transfer) => Ok(self.with_lines(vec![transfer]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn with_lines(&self, transfers: Vec<Transfer>) -> Result<Vec<TransferWithLines>> {
        let ids: Vec<i64> = transfers.iter().map(|t| t.id).collect();
        let lines: Vec<TransferLine> = LineTable::TRANSFERS.fetch(&self.pool, &ids).await?;
        let mut grouped = group_by_parent(lines, |line| line.traslado_id);

        Ok(transfers
            .into_iter()
            .map(|transfer| TransferWithLines {
                detalles: grouped.remove(&transfer.id).unwrap_or_default(),
                transfer,
            })
            .collect())
    }

    pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<Option<Transfer>> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM traslados WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(transfer)
    }

    pub async fn lines(conn: &mut PgConnection, id: i64) -> Result<Vec<TransferLine>> {
        LineTable::TRANSFERS.fetch(conn, &[id]).await
    }

    pub async fn insert(conn: &mut PgConnection, request: &TransferRequest) -> Result<Transfer> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            r#"
            INSERT INTO traslados (kind, counterpart, description, transferred_at)
            VALUES ($1, $2, $3, COALESCE($4, NOW()))
            RETURNING {TRANSFER_COLUMNS}
            "#
        ))
        .bind(request.kind.as_str())
        .bind(&request.counterpart)
        .bind(&request.description)
        .bind(request.transferred_at)
        .fetch_one(conn)
        .await?;

        Ok(transfer)
    }

    pub async fn update_header(conn: &mut PgConnection, id: i64, request: &TransferRequest) -> Result<Transfer> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            r#"
            UPDATE traslados
            SET kind = $2,
                counterpart = COALESCE($3, counterpart),
                description = COALESCE($4, description),
                transferred_at = COALESCE($5, transferred_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TRANSFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.kind.as_str())
        .bind(&request.counterpart)
        .bind(&request.description)
        .bind(request.transferred_at)
        .fetch_one(conn)
        .await?;

        Ok(transfer)
    }

    pub async fn deactivate(conn: &mut PgConnection, id: i64) -> Result<Transfer> {
        let transfer = sqlx::query_as::<_, Transfer>(&format!(
            "UPDATE traslados SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING {TRANSFER_COLUMNS}"
        ))
        .bind(id)
        .bind(ESTADO_INACTIVO)
        .fetch_one(conn)
        .await?;

        Ok(transfer)
    }
}
