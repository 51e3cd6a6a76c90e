//! Stock arithmetic shared by transfers, orders and sales
//!
//! Documents never touch stock rows directly. They describe their effect as
//! signed deltas in a [`StockLedger`]; an update records the reversal of the
//! stored document and the application of the new one in the same ledger, so
//! only the net change per location and product reaches the database.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::models::LineInput;
use crate::utils::errors::{ColectaError, Result};

/// Where a quantity of product is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StockLocation {
    /// `productos.stock`
    Warehouse,
    /// `detalle_productos.quantity` of a stand
    Stand(i64),
}

impl fmt::Display for StockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLocation::Warehouse => f.write_str("warehouse"),
            StockLocation::Stand(id) => write!(f, "stand {}", id),
        }
    }
}

/// Net stock deltas keyed by location and product, iterated in lock order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLedger {
    deltas: BTreeMap<(StockLocation, i64), i64>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, location: StockLocation, producto_id: i64, delta: i64) -> Result<()> {
        let entry = self.deltas.entry((location, producto_id)).or_insert(0);
        *entry = entry
            .checked_add(delta)
            .ok_or_else(|| quantity_overflow(location, producto_id))?;
        Ok(())
    }

    /// Record every line at `location`, multiplied by `sign`
    pub fn add_lines<'a>(
        &mut self,
        location: StockLocation,
        lines: impl IntoIterator<Item = &'a LineInput>,
        sign: i64,
    ) -> Result<()> {
        for line in lines {
            let delta = sign
                .checked_mul(line.quantity)
                .ok_or_else(|| quantity_overflow(location, line.producto_id))?;
            self.add(location, line.producto_id, delta)?;
        }
        Ok(())
    }

    pub fn delta(&self, location: StockLocation, producto_id: i64) -> i64 {
        self.deltas.get(&(location, producto_id)).copied().unwrap_or(0)
    }

    /// Non-zero deltas, warehouse first, then stands by id, products by id
    pub fn entries(&self) -> impl Iterator<Item = (StockLocation, i64, i64)> + '_ {
        self.deltas
            .iter()
            .filter(|(_, delta)| **delta != 0)
            .map(|((location, producto_id), delta)| (*location, *producto_id, *delta))
    }

    /// Whether applying the ledger would change nothing
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

/// One applied stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub location: StockLocation,
    pub producto_id: i64,
    pub before: i64,
    pub after: i64,
}

impl StockChange {
    /// Whether this change took the level from above `threshold` to at or below it
    pub fn crosses_below(&self, threshold: i64) -> bool {
        self.before > threshold && self.after <= threshold
    }
}

fn quantity_overflow(location: StockLocation, producto_id: i64) -> ColectaError {
    ColectaError::validation(format!(
        "quantity of product {} at {} is out of range",
        producto_id, location
    ))
}

/// Apply one delta to an available quantity; stock may never go negative
pub fn apply_delta(location: StockLocation, producto_id: i64, available: i64, delta: i64) -> Result<StockChange> {
    let after = available
        .checked_add(delta)
        .ok_or_else(|| quantity_overflow(location, producto_id))?;
    if after < 0 {
        return Err(ColectaError::InsufficientStock {
            product_id: producto_id,
            location: location.to_string(),
            available,
            requested: delta.saturating_neg(),
        });
    }
    Ok(StockChange {
        location,
        producto_id,
        before: available,
        after,
    })
}

/// How the stored detail lines of a document turn into the submitted ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePlan {
    /// Stored lines whose product or quantity changes, carrying their id
    pub updated: Vec<LineInput>,
    /// Submitted lines without an id
    pub inserted: Vec<LineInput>,
    /// Ids of stored lines absent from the submission
    pub deleted: Vec<i64>,
}

/// Diff the stored lines (all with `id`) against a submitted line set
pub fn plan_lines(existing: &[LineInput], submitted: &[LineInput]) -> Result<LinePlan> {
    let stored: HashMap<i64, &LineInput> = existing
        .iter()
        .filter_map(|line| line.id.map(|id| (id, line)))
        .collect();

    let mut plan = LinePlan::default();
    for line in submitted {
        match line.id {
            Some(id) => {
                let current = stored.get(&id).ok_or_else(|| {
                    ColectaError::validation(format!("line {} does not belong to this document", id))
                })?;
                if current.producto_id != line.producto_id || current.quantity != line.quantity {
                    plan.updated.push(*line);
                }
            }
            None => plan.inserted.push(*line),
        }
    }

    plan.deleted = existing
        .iter()
        .filter_map(|line| line.id)
        .filter(|id| !submitted.iter().any(|line| line.id == Some(*id)))
        .collect();

    Ok(plan)
}
