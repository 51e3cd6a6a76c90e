//! Detail line tables shared by transfers and orders

use std::collections::HashMap;

use sqlx::postgres::PgRow;
use sqlx::{Executor, FromRow, PgConnection, Postgres};

use crate::utils::errors::Result;

/// A `(id, <parent>, producto_id, quantity)` detail table
#[derive(Debug, Clone, Copy)]
pub struct LineTable {
    pub table: &'static str,
    pub parent: &'static str,
}

impl LineTable {
    pub const TRANSFERS: LineTable = LineTable {
        table: "detalle_traslados",
        parent: "traslado_id",
    };

    pub const ORDERS: LineTable = LineTable {
        table: "detalle_pedidos",
        parent: "pedido_id",
    };

    /// Lines of every parent in `parent_ids`, ordered by id
    pub async fn fetch<'e, E, L>(&self, executor: E, parent_ids: &[i64]) -> Result<Vec<L>>
    where
        E: Executor<'e, Database = Postgres>,
        L: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "SELECT id, {parent}, producto_id, quantity FROM {table} WHERE {parent} = ANY($1) ORDER BY id",
            parent = self.parent,
            table = self.table
        );
        let lines = sqlx::query_as::<_, L>(&sql)
            .bind(parent_ids)
            .fetch_all(executor)
            .await?;
        Ok(lines)
    }

    pub async fn insert(&self, conn: &mut PgConnection, parent_id: i64, producto_id: i64, quantity: i64) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}, producto_id, quantity) VALUES ($1, $2, $3)",
            self.table, self.parent
        );
        sqlx::query(&sql)
            .bind(parent_id)
            .bind(producto_id)
            .bind(quantity)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update(&self, conn: &mut PgConnection, id: i64, producto_id: i64, quantity: i64) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET producto_id = $2, quantity = $3 WHERE id = $1",
            self.table
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(producto_id)
            .bind(quantity)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, conn: &mut PgConnection, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", self.table);
        sqlx::query(&sql).bind(ids).execute(conn).await?;
        Ok(())
    }
}

/// Group detail lines by their parent document id
pub fn group_by_parent<L>(lines: Vec<L>, parent_of: impl Fn(&L) -> i64) -> HashMap<i64, Vec<L>> {
    let mut grouped: HashMap<i64, Vec<L>> = HashMap::new();
    for line in lines {
        grouped.entry(parent_of(&line)).or_default().push(line);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_parent_keeps_line_order() {
        let lines = vec![(1, 10), (2, 11), (1, 12)];
        let grouped = group_by_parent(lines, |line| line.0);
        assert_eq!(grouped[&1], vec![(1, 10), (1, 12)]);
        assert_eq!(grouped[&2], vec![(2, 11)]);
        assert!(!grouped.contains_key(&3));
    }
}
