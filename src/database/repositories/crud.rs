//! Generic repository for resources that follow the plain CRUD convention
//!
//! A [`Resource`] describes its table and how its create/update payloads
//! turn into SQL; [`CrudRepository`] runs the shared statements.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Encode, Executor, FromRow, PgPool, Postgres, QueryBuilder, Type};

use crate::models::{Validate, ESTADO_ACTIVO, ESTADO_INACTIVO};
use crate::utils::errors::Result;

/// Assignment list of an `UPDATE ... SET` statement
pub type SetList<'qb, 'args> = Separated<'qb, 'args, Postgres, &'static str>;

pub trait Resource:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    /// Table name
    const TABLE: &'static str;
    /// Column list used in `SELECT` and `RETURNING`
    const COLUMNS: &'static str;
    /// Route segment, also the prefix of the write permission
    const PATH: &'static str;
    /// Name used in not-found errors
    const NAME: &'static str;

    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;

    /// Permission required for writes
    fn permission() -> String {
        format!("{}.gestionar", Self::PATH)
    }

    /// Push `(columns) VALUES (...)` for a new row
    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: Self::Create);

    /// Push the `column = COALESCE(value, column)` assignments of an update
    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: Self::Update);

    /// Invariants that span several columns, checked on the merged row
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Push `column = COALESCE($n, column)`, keeping the stored value when `value` is empty
pub fn coalesce<'args, V>(set: &mut SetList<'_, 'args>, column: &str, value: Option<V>)
where
    V: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    set.push(format!("{} = COALESCE(", column));
    set.push_bind_unseparated(value);
    set.push_unseparated(format!(", {})", column));
}

#[derive(Debug)]
pub struct CrudRepository<T> {
    pool: PgPool,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for CrudRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> CrudRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    /// All rows ordered by id
    pub async fn list(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", T::COLUMNS, T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Rows with `estado = 1`
    pub async fn list_active(&self) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE estado = $1 ORDER BY id",
            T::COLUMNS,
            T::TABLE
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(ESTADO_ACTIVO)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<T>> {
        Self::find_in(&self.pool, id).await
    }

    /// Fetch one row through any executor, e.g. an open transaction
    pub async fn find_in<'e, E>(executor: E, id: i64) -> Result<Option<T>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, request: T::Create) -> Result<T> {
        Self::insert_in(&self.pool, request).await
    }

    /// Insert a row through any executor
    pub async fn insert_in<'e, E>(executor: E, request: T::Create) -> Result<T>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::new(format!("INSERT INTO {} ", T::TABLE));
        T::push_insert(&mut qb, request);
        qb.push(format!(" RETURNING {}", T::COLUMNS));

        let row = qb.build_query_as::<T>().fetch_one(executor).await?;
        Ok(row)
    }

    /// Merge the update into the stored row; `None` when the id does not exist
    pub async fn update(&self, id: i64, request: T::Update) -> Result<Option<T>> {
        let mut tx = self.pool.begin().await?;
        let row = Self::update_in(&mut *tx, id, request).await?;
        if let Some(row) = &row {
            row.check()?;
        }
        tx.commit().await?;
        Ok(row)
    }

    /// Run the update statement through any executor without the row check
    pub async fn update_in<'e, E>(executor: E, id: i64, request: T::Update) -> Result<Option<T>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
        {
            let mut set = qb.separated(", ");
            T::push_update(&mut set, request);
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", T::COLUMNS));

        let row = qb.build_query_as::<T>().fetch_optional(executor).await?;
        Ok(row)
    }

    /// Soft delete: set `estado = 0` and return the row
    pub async fn deactivate(&self, id: i64) -> Result<Option<T>> {
        let sql = format!(
            "UPDATE {} SET estado = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            T::TABLE,
            T::COLUMNS
        );
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(ESTADO_INACTIVO)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn count_active(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE estado = $1", T::TABLE);
        let count: (i64,) = sqlx::query_as(&sql)
            .bind(ESTADO_ACTIVO)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
