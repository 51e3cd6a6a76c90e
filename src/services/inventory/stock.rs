//! Applying a ledger inside an open transaction

use std::collections::HashMap;

use sqlx::PgConnection;

use super::ledger::{apply_delta, StockChange, StockLedger, StockLocation};
use crate::database::repositories::stock::{self, ProductRef};
use crate::database::repositories::NotificationRepository;
use crate::models::LineInput;
use crate::utils::errors::{ColectaError, Result};
use crate::utils::logging::log_stock_change;

/// Lock, check and write every entry of the ledger in lock order.
/// A change that crosses `low_stock_threshold` downwards inserts a broadcast
/// notification in the same transaction.
pub async fn apply_ledger(
    conn: &mut PgConnection,
    ledger: &StockLedger,
    low_stock_threshold: i64,
) -> Result<Vec<StockChange>> {
    let mut changes = Vec::new();

    for (location, producto_id, delta) in ledger.entries() {
        let (change, product_name) = match location {
            StockLocation::Warehouse => {
                let row = stock::lock_warehouse(conn, producto_id)
                    .await?
                    .ok_or(ColectaError::NotFound { resource: "producto", id: producto_id })?;
                let change = apply_delta(location, producto_id, row.quantity, delta)?;
                stock::set_warehouse(conn, producto_id, change.after).await?;
                (change, row.product_name)
            }
            StockLocation::Stand(stand_id) => {
                if delta > 0 {
                    stock::ensure_stand_row(conn, stand_id, producto_id).await?;
                }
                let Some(row) = stock::lock_stand(conn, stand_id, producto_id).await? else {
                    return Err(ColectaError::InsufficientStock {
                        product_id: producto_id,
                        location: location.to_string(),
                        available: 0,
                        requested: -delta,
                    });
                };
                let change = apply_delta(location, producto_id, row.quantity, delta)?;
                stock::set_stand(conn, stand_id, producto_id, change.after).await?;
                (change, row.product_name)
            }
        };

        log_stock_change(&location.to_string(), producto_id, change.before, change.after);

        if change.crosses_below(low_stock_threshold) {
            let message = format!(
                "{} at {}: {} left (threshold {})",
                product_name, location, change.after, low_stock_threshold
            );
            NotificationRepository::insert_broadcast(conn, "Low stock", &message).await?;
        }

        changes.push(change);
    }

    Ok(changes)
}

/// Distinct product ids referenced by the lines
pub fn product_ids(lines: &[LineInput]) -> Vec<i64> {
    let mut ids: Vec<i64> = lines.iter().map(|line| line.producto_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Every referenced product must exist and be active
pub async fn require_active_products(
    conn: &mut PgConnection,
    lines: &[LineInput],
) -> Result<HashMap<i64, ProductRef>> {
    let ids = product_ids(lines);
    let products: HashMap<i64, ProductRef> = stock::active_products(conn, &ids)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    if let Some(missing) = ids.iter().find(|id| !products.contains_key(id)) {
        return Err(ColectaError::NotFound { resource: "producto", id: *missing });
    }
    Ok(products)
}

pub async fn require_active_stand(conn: &mut PgConnection, stand_id: i64) -> Result<()> {
    if stock::stand_is_active(conn, stand_id).await? {
        Ok(())
    } else {
        Err(ColectaError::NotFound { resource: "stand", id: stand_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids_are_distinct_and_sorted() {
        let lines = [LineInput::new(5, 1), LineInput::new(2, 3), LineInput::new(5, 2)];
        assert_eq!(product_ids(&lines), vec![2, 5]);
    }
}
