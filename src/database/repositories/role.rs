//! Role permission assignments

use sqlx::PgPool;

use crate::models::role::{Permission, Role};
use crate::utils::errors::{ColectaError, Result};

#[derive(Clone, Debug)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, estado, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Permissions currently granted to a role
    pub async fn permissions(&self, role_id: i64) -> Result<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name, p.description, p.estado, p.created_at, p.updated_at
            FROM rol_permisos rp
            JOIN permisos p ON p.id = rp.permiso_id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(permissions)
    }

    /// Replace the permission set of a role in one transaction
    pub async fn replace_permissions(&self, role_id: i64, permiso_ids: &[i64]) -> Result<Vec<Permission>> {
        let mut tx = self.pool.begin().await?;

        let role: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await?;
        if role.is_none() {
            return Err(ColectaError::NotFound { resource: "role", id: role_id });
        }

        let known: Vec<(i64,)> = sqlx::query_as("SELECT id FROM permisos WHERE id = ANY($1)")
            .bind(permiso_ids)
            .fetch_all(&mut *tx)
            .await?;
        if let Some(missing) = permiso_ids
            .iter()
            .find(|id| !known.iter().any(|(known_id,)| known_id == *id))
        {
            return Err(ColectaError::validation(format!("permiso {} does not exist", missing)));
        }

        sqlx::query("DELETE FROM rol_permisos WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO rol_permisos (role_id, permiso_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permiso_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.permissions(role_id).await
    }
}
