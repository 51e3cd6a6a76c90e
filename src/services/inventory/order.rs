//! Orders move stock from the warehouse to a stand

use tracing::info;

use super::ledger::{plan_lines, StockLedger, StockLocation};
use super::stock::{apply_ledger, require_active_products, require_active_stand};
use super::InventoryService;
use crate::database::repositories::lines::LineTable;
use crate::database::OrderRepository;
use crate::models::{LineInput, OrderLine, OrderRequest, OrderWithLines, Validate, ESTADO_ACTIVO};
use crate::utils::errors::{ColectaError, Result};

fn stored_lines(lines: &[OrderLine]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|line| LineInput {
            id: Some(line.id),
            producto_id: line.producto_id,
            quantity: line.quantity,
        })
        .collect()
}

/// Record the movement of `lines` from the warehouse to the stand, or back when `sign` is -1
fn record_order(ledger: &mut StockLedger, stand_id: i64, lines: &[LineInput], sign: i64) -> Result<()> {
    ledger.add_lines(StockLocation::Warehouse, lines, -sign)?;
    ledger.add_lines(StockLocation::Stand(stand_id), lines, sign)
}

impl InventoryService {
    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderWithLines> {
        request.validate()?;
        if request.detalles.iter().any(|line| line.id.is_some()) {
            return Err(ColectaError::validation("new orders cannot reference existing lines"));
        }

        let mut tx = self.pool.begin().await?;
        require_active_stand(&mut *tx, request.stand_id).await?;
        require_active_products(&mut *tx, &request.detalles).await?;

        let order = OrderRepository::insert(&mut *tx, &request).await?;
        for line in &request.detalles {
            LineTable::ORDERS
                .insert(&mut *tx, order.id, line.producto_id, line.quantity)
                .await?;
        }

        let mut ledger = StockLedger::new();
        record_order(&mut ledger, request.stand_id, &request.detalles, 1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let detalles = OrderRepository::lines(&mut *tx, order.id).await?;
        tx.commit().await?;

        info!(pedido_id = order.id, stand_id = order.stand_id, "Order created");
        Ok(OrderWithLines { order, detalles })
    }

    /// Replace header and lines; a stand change reverses against the old stand
    pub async fn update_order(&self, id: i64, request: OrderRequest) -> Result<OrderWithLines> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = OrderRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "pedido", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("pedido {} is inactive", id)));
        }
        require_active_stand(&mut *tx, request.stand_id).await?;

        let existing = stored_lines(&OrderRepository::lines(&mut *tx, id).await?);
        let plan = plan_lines(&existing, &request.detalles)?;
        require_active_products(&mut *tx, &request.detalles).await?;

        let order = OrderRepository::update_header(&mut *tx, id, &request).await?;
        LineTable::ORDERS.delete(&mut *tx, &plan.deleted).await?;
        for line in &plan.updated {
            if let Some(line_id) = line.id {
                LineTable::ORDERS
                    .update(&mut *tx, line_id, line.producto_id, line.quantity)
                    .await?;
            }
        }
        for line in &plan.inserted {
            LineTable::ORDERS
                .insert(&mut *tx, id, line.producto_id, line.quantity)
                .await?;
        }

        let mut ledger = StockLedger::new();
        record_order(&mut ledger, current.stand_id, &existing, -1)?;
        record_order(&mut ledger, request.stand_id, &request.detalles, 1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let detalles = OrderRepository::lines(&mut *tx, id).await?;
        tx.commit().await?;

        info!(pedido_id = id, stand_id = order.stand_id, "Order updated");
        Ok(OrderWithLines { order, detalles })
    }

    /// Return the ordered stock to the warehouse and deactivate the order
    pub async fn delete_order(&self, id: i64) -> Result<OrderWithLines> {
        let mut tx = self.pool.begin().await?;
        let current = OrderRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "pedido", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("pedido {} is already inactive", id)));
        }

        let detalles = OrderRepository::lines(&mut *tx, id).await?;
        let mut ledger = StockLedger::new();
        record_order(&mut ledger, current.stand_id, &stored_lines(&detalles), -1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let order = OrderRepository::deactivate(&mut *tx, id).await?;
        tx.commit().await?;

        info!(pedido_id = id, "Order deleted and stock returned");
        Ok(OrderWithLines { order, detalles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stand_change_moves_stock_between_stands() {
        let old = [LineInput { id: Some(1), producto_id: 3, quantity: 4 }];
        let new = [LineInput { id: Some(1), producto_id: 3, quantity: 4 }];
        let mut ledger = StockLedger::new();
        record_order(&mut ledger, 1, &old, -1).unwrap();
        record_order(&mut ledger, 2, &new, 1).unwrap();

        assert_eq!(ledger.delta(StockLocation::Warehouse, 3), 0);
        assert_eq!(ledger.delta(StockLocation::Stand(1), 3), -4);
        assert_eq!(ledger.delta(StockLocation::Stand(2), 3), 4);
    }
}
