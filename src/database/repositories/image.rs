//! Image path columns of products and events

use sqlx::PgPool;

use crate::utils::errors::Result;

/// Entities that carry an uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Product,
    Event,
}

impl ImageOwner {
    pub fn table(&self) -> &'static str {
        match self {
            ImageOwner::Product => "productos",
            ImageOwner::Event => "eventos",
        }
    }

    /// Sub-directory of the upload dir, also the public URL segment
    pub fn dir(&self) -> &'static str {
        self.table()
    }

    pub fn resource(&self) -> &'static str {
        match self {
            ImageOwner::Product => "producto",
            ImageOwner::Event => "evento",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current image path; `None` when the row does not exist
    pub async fn current(&self, owner: ImageOwner, id: i64) -> Result<Option<Option<String>>> {
        let sql = format!("SELECT image_path FROM {} WHERE id = $1", owner.table());
        let row: Option<(Option<String>,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(path,)| path))
    }

    pub async fn set(&self, owner: ImageOwner, id: i64, path: &str) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET image_path = $2, updated_at = NOW() WHERE id = $1",
            owner.table()
        );
        sqlx::query(&sql).bind(id).bind(path).execute(&self.pool).await?;

        Ok(())
    }
}
