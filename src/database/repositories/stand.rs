//! Stand queries beyond plain CRUD: per-event listing, volunteer
//! assignment and the stand inventory view

use sqlx::PgPool;

use crate::models::{InventoryLine, Stand, StandAssignment, Volunteer, ESTADO_ACTIVO};
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct StandRepository {
    pool: PgPool,
}

impl StandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active stands of an event
    pub async fn by_event(&self, evento_id: i64) -> Result<Vec<Stand>> {
        let stands = sqlx::query_as::<_, Stand>(
            r#"
            SELECT id, evento_id, name, description, location, estado, created_at, updated_at
            FROM stands
            WHERE evento_id = $1 AND estado = $2
            ORDER BY id
            "#,
        )
        .bind(evento_id)
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(stands)
    }

    pub async fn volunteers(&self, stand_id: i64) -> Result<Vec<Volunteer>> {
        let volunteers = sqlx::query_as::<_, Volunteer>(
            r#"
            SELECT v.id, v.persona_id, v.skills, v.availability, v.joined_on, v.estado, v.created_at, v.updated_at
            FROM stand_voluntarios sv
            JOIN voluntarios v ON v.id = sv.voluntario_id
            WHERE sv.stand_id = $1
            ORDER BY sv.assigned_at
            "#,
        )
        .bind(stand_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(volunteers)
    }

    pub async fn is_assigned(&self, stand_id: i64, voluntario_id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT stand_id FROM stand_voluntarios WHERE stand_id = $1 AND voluntario_id = $2",
        )
        .bind(stand_id)
        .bind(voluntario_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    pub async fn assign(&self, stand_id: i64, voluntario_id: i64) -> Result<StandAssignment> {
        let assignment = sqlx::query_as::<_, StandAssignment>(
            r#"
            INSERT INTO stand_voluntarios (stand_id, voluntario_id)
            VALUES ($1, $2)
            RETURNING stand_id, voluntario_id, assigned_at
            "#,
        )
        .bind(stand_id)
        .bind(voluntario_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    /// Remove an assignment, `false` when there was none
    pub async fn unassign(&self, stand_id: i64, voluntario_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM stand_voluntarios WHERE stand_id = $1 AND voluntario_id = $2",
        )
        .bind(stand_id)
        .bind(voluntario_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Inventory of a stand joined with product name and price
    pub async fn inventory(&self, stand_id: i64) -> Result<Vec<InventoryLine>> {
        let lines = sqlx::query_as::<_, InventoryLine>(
            r#"
            SELECT dp.id, dp.stand_id, dp.producto_id, p.name AS product_name, p.price_cents, dp.quantity
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

        Ok(lines)
    }
}
