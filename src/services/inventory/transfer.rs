//! Transfers move stock into (`Recibido`) or out of (`Enviado`) the warehouse

use tracing::info;

use super::ledger::{plan_lines, StockLedger, StockLocation};
use super::stock::{apply_ledger, require_active_products};
use super::InventoryService;
use crate::database::repositories::lines::LineTable;
use crate::database::TransferRepository;
use crate::models::{LineInput, TransferLine, TransferRequest, TransferWithLines, Validate, ESTADO_ACTIVO};
use crate::utils::errors::{ColectaError, Result};

fn stored_lines(lines: &[TransferLine]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|line| LineInput {
            id: Some(line.id),
            producto_id: line.producto_id,
            quantity: line.quantity,
        })
        .collect()
}

impl InventoryService {
    pub async fn create_transfer(&self, request: TransferRequest) -> Result<TransferWithLines> {
        request.validate()?;
        if request.detalles.iter().any(|line| line.id.is_some()) {
            return Err(ColectaError::validation("new transfers cannot reference existing lines"));
        }

        let mut tx = self.pool.begin().await?;
        require_active_products(&mut *tx, &request.detalles).await?;

        let transfer = TransferRepository::insert(&mut *tx, &request).await?;
        for line in &request.detalles {
            LineTable::TRANSFERS
                .insert(&mut *tx, transfer.id, line.producto_id, line.quantity)
                .await?;
        }

        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Warehouse, &request.detalles, request.kind.stock_sign())?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let detalles = TransferRepository::lines(&mut *tx, transfer.id).await?;
        tx.commit().await?;

        info!(traslado_id = transfer.id, kind = %transfer.kind, lines = detalles.len(), "Transfer created");
        Ok(TransferWithLines { transfer, detalles })
    }

    /// Replace header and lines, adjusting warehouse stock by the net difference
    pub async fn update_transfer(&self, id: i64, request: TransferRequest) -> Result<TransferWithLines> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = TransferRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "traslado", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("traslado {} is inactive", id)));
        }

        let existing = stored_lines(&TransferRepository::lines(&mut *tx, id).await?);
        let plan = plan_lines(&existing, &request.detalles)?;
        require_active_products(&mut *tx, &request.detalles).await?;

        let transfer = TransferRepository::update_header(&mut *tx, id, &request).await?;
        LineTable::TRANSFERS.delete(&mut *tx, &plan.deleted).await?;
        for line in &plan.updated {
            if let Some(line_id) = line.id {
                LineTable::TRANSFERS
                    .update(&mut *tx, line_id, line.producto_id, line.quantity)
                    .await?;
            }
        }
        for line in &plan.inserted {
            LineTable::TRANSFERS
                .insert(&mut *tx, id, line.producto_id, line.quantity)
                .await?;
        }

        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Warehouse, &existing, -current.kind.stock_sign())?;
        ledger.add_lines(StockLocation::Warehouse, &request.detalles, request.kind.stock_sign())?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let detalles = TransferRepository::lines(&mut *tx, id).await?;
        tx.commit().await?;

        info!(traslado_id = id, kind = %transfer.kind, "Transfer updated");
        Ok(TransferWithLines { transfer, detalles })
    }

    /// Reverse every line and deactivate the transfer
    pub async fn delete_transfer(&self, id: i64) -> Result<TransferWithLines> {
        let mut tx = self.pool.begin().await?;
        let current = TransferRepository::lock(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "traslado", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("traslado {} is already inactive", id)));
        }

        let detalles = TransferRepository::lines(&mut *tx, id).await?;
        let mut ledger = StockLedger::new();
        ledger.add_lines(StockLocation::Warehouse, &stored_lines(&detalles), -current.kind.stock_sign())?;
        apply_ledger(&mut *tx, &ledger, self.low_stock_threshold).await?;

        let transfer = TransferRepository::deactivate(&mut *tx, id).await?;
        tx.commit().await?;

        info!(traslado_id = id, "Transfer deleted and stock reversed");
        Ok(TransferWithLines { transfer, detalles })
    }
}
