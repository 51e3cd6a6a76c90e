//! User repository implementation

use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};
use crate::models::{ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::errors::Result;

const USER_COLUMNS: &str =
    "id, persona_id, username, password_hash, role_id, estado, last_login_at, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already hashed password
    pub async fn create(&self, request: CreateUserRequest, password_hash: String) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO usuarios (persona_id, username, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.persona_id)
        .bind(request.username)
        .bind(password_hash)
        .bind(request.role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by login name
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user, replacing the password hash when one is given
    pub async fn update(
        &self,
        id: i64,
        request: UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE usuarios
            SET persona_id = COALESCE($2, persona_id),
                username = COALESCE($3, username),
                password_hash = COALESCE($4, password_hash),
                role_id = COALESCE($5, role_id),
                estado = COALESCE($6, estado),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.persona_id)
        .bind(request.username)
        .bind(password_hash)
        .bind(request.role_id)
        .bind(request.estado)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_password(&self, id: i64, password_hash: String) -> Result<()> {
        sqlx::query("UPDATE usuarios SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Soft delete
    pub async fn deactivate(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE usuarios SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(ESTADO_INACTIVO)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn list_active(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE estado = $1 ORDER BY id"
        ))
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE usuarios SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Names of the active permissions granted to the user's role
    pub async fn permission_names(&self, user_id: i64) -> Result<Vec<String>> {
        let names: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT p.name
            FROM usuarios u
            JOIN roles r ON r.id = u.role_id AND r.estado = $2
            JOIN rol_permisos rp ON rp.role_id = r.id
            JOIN permisos p ON p.id = rp.permiso_id AND p.estado = $2
            WHERE u.id = $1
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    /// Ids of the users holding a role
    pub async fn ids_with_role(&self, role_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM usuarios WHERE role_id = $1")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
