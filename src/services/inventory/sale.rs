//! Sales consume stand inventory and are priced from the product catalogue

use std::collections::HashMap;

use tracing::info;

use super::ledger::{plan_lines, StockLedger, StockLocation};
use super::stock::{apply_ledger, require_active_products, require_active_stand};
use super::InventoryService;
use crate::database::SaleRepository;
use crate::models::{LineInput, SaleLine, SaleRequest, SaleWithLines, Validate, ESTADO_ACTIVO};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::format_cents;

fn stored_lines(lines: &[SaleLine]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|line| LineInput {
            id: Some(line.id),
            producto_id: line.producto_id,
            quantity: line.quantity,
        })
        .collect()
}

/// Unit price of an updated line: kept while the product stays the same
fn unit_price_for(line: &LineInput, stored: &HashMap<i64, &SaleLine>, current_price: i64) -> i64 {
    line.id
        .and_then(|id| stored.get(&id))
        .filter(|previous| previous.producto_id == line.producto_id)
        .map(|previous| previous.unit_price_cents)
        .unwrap_or(current_price)
}

impl InventoryService {
    pub async fn create_sale(&self, request: SaleRequest) -> Result<SaleWithLines> {
        request.validate()?;
        if request.detalles.iter().any(|line| line.id.is_some()) {
            return Err(ColectaError::validation("new sales cannot reference existing lines"));
        }

        let mut tx = self.pool.begin().await?;
        require_active_stand(&mut *tx, request.stand_id).await?;
        let products = require_active_products(&mut *tx, &request.detalles).await?;

        let sale = SaleRepository::insert(&mut *tx, &request).await?;
        for line in &request.detalles {
            let price = products[&line.producto_id].price_cents;
            SaleRepository::insert_line(&mut *tx, sale.id, line.producto_id, line.quantity, price).await?;
        }

        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Stand(request.stand_id), &request.detalles, -1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let sale = SaleRepository::refresh_total(&mut *tx, sale.id).await?;
        let detalles = SaleRepository::lines(&mut *tx, sale.id).await?;
        tx.commit().await?;

        info!(venta_id = sale.id, stand_id = sale.stand_id, total = %format_cents(sale.total_cents), "Sale registered");
        Ok(SaleWithLines { sale, detalles })
    }

    /// Replace the line set, restocking removed quantities and charging new ones
    pub async fn update_sale(&self, id: i64, request: SaleRequest) -> Result<SaleWithLines> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = SaleRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "venta", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("venta {} is inactive", id)));
        }
        require_active_stand(&mut *tx, request.stand_id).await?;

        let stored = SaleRepository::lines(&mut *tx, id).await?;
        let existing = stored_lines(&stored);
        let plan = plan_lines(&existing, &request.detalles)?;
        let products = require_active_products(&mut *tx, &request.detalles).await?;
        let stored_by_id: HashMap<i64, &SaleLine> = stored.iter().map(|line| (line.id, line)).collect();

        SaleRepository::update_header(&mut *tx, id, &request).await?;
        SaleRepository::delete_lines(&mut *tx, &plan.deleted).await?;
        for line in &plan.updated {
            if let Some(line_id) = line.id {
                let price = unit_price_for(line, &stored_by_id, products[&line.producto_id].price_cents);
                SaleRepository::update_line(&mut *tx, line_id, line.producto_id, line.quantity, price).await?;
            }
        }
        for line in &plan.inserted {
            let price = products[&line.producto_id].price_cents;
            SaleRepository::insert_line(&mut *tx, id, line.producto_id, line.quantity, price).await?;
        }

        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Stand(current.stand_id), &existing, 1)?;
        ledger.add_lines(StockLocation::Stand(request.stand_id), &request.detalles, -1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let sale = SaleRepository::refresh_total(&mut *tx, id).await?;
        let detalles = SaleRepository::lines(&mut *tx, id).await?;
        tx.commit().await?;

        info!(venta_id = id, total = %format_cents(sale.total_cents), "Sale updated");
        Ok(SaleWithLines { sale, detalles })
    }

    /// Restock the stand and deactivate the sale
    pub async fn delete_sale(&self, id: i64) -> Result<SaleWithLines> {
        let mut tx = self.pool.begin().await?;
        let current = SaleRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "venta", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("venta {} is already inactive", id)));
        }

        let detalles = SaleRepository::lines(&mut *tx, id).await?;
        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Stand(current.stand_id), &stored_lines(&detalles), 1)?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let sale = SaleRepository::deactivate(&mut *tx, id).await?;
        tx.commit().await?;

        info!(venta_id = id, "Sale deleted and stand restocked");
        Ok(SaleWithLines { sale, detalles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale_line(id: i64, producto_id: i64, unit_price_cents: i64) -> SaleLine {
        SaleLine {
            id,
            venta_id: 1,
            producto_id,
            quantity: 1,
            unit_price_cents,
            subtotal_cents: unit_price_cents,
        }
    }

    #[test]
    fn test_price_kept_for_same_product() {
        let previous = sale_line(10, 3, 500);
        let stored: HashMap<i64, &SaleLine> = [(10, &previous)].into_iter().collect();

        let same_product = LineInput { id: Some(10), producto_id: 3, quantity: 4 };
        assert_eq!(unit_price_for(&same_product, &stored, 650), 500);

        let other_product = LineInput { id: Some(10), producto_id: 4, quantity: 4 };
        assert_eq!(unit_price_for(&other_product, &stored, 650), 650);

        assert_eq!(unit_price_for(&LineInput::new(3, 1), &stored, 650), 650);
    }
}
