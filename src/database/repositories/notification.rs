//! Notification queries

use sqlx::{PgConnection, PgPool};

use crate::models::{Notification, ESTADO_ACTIVO};
use crate::utils::errors::Result;

const NOTIFICATION_COLUMNS: &str =
    "id, usuario_id, title, message, read_at, estado, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active notifications addressed to the user plus broadcasts, newest first
    pub async fn for_user(&self, usuario_id: i64) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notificaciones
            WHERE (usuario_id = $1 OR usuario_id IS NULL) AND estado = $2
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(usuario_id)
        .bind(ESTADO_ACTIVO)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Set `read_at` unless already set
    pub async fn mark_read(&self, id: i64) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notificaciones
            SET read_at = COALESCE(read_at, NOW()), updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Insert a broadcast inside an open transaction
    pub async fn insert_broadcast(conn: &mut PgConnection, title: &str, message: &str) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notificaciones (usuario_id, title, message)
            VALUES (NULL, $1, $2)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(message)
        .fetch_one(conn)
        .await?;

        Ok(notification)
    }
}
