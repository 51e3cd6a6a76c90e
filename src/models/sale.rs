//! Sale (`venta`) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lines::{validate_lines, LineInput};
use super::Validate;
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::require_id;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: i64,
    pub stand_id: i64,
    pub voluntario_id: Option<i64>,
    pub sold_at: DateTime<Utc>,
    pub total_cents: i64,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SaleLine {
    pub id: i64,
    pub venta_id: i64,
    pub producto_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleWithLines {
    #[serde(flatten)]
    pub sale: Sale,
    pub detalles: Vec<SaleLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub stand_id: i64,
    pub voluntario_id: Option<i64>,
    pub sold_at: Option<DateTime<Utc>>,
    pub detalles: Vec<LineInput>,
}

/// `quantity * unit_price_cents`, rejected when it does not fit in cents
pub fn line_subtotal(quantity: i64, unit_price_cents: i64) -> Result<i64> {
    quantity.checked_mul(unit_price_cents).ok_or_else(|| {
        ColectaError::validation(format!(
            "subtotal of {} x {} cents is out of range",
            quantity, unit_price_cents
        ))
    })
}

impl Validate for SaleRequest {
    fn validate(&self) -> Result<()> {
        require_id("stand_id", self.stand_id)?;
        if let Some(voluntario_id) = self.voluntario_id {
            require_id("voluntario_id", voluntario_id)?;
        }
        validate_lines(&self.detalles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(3, 250).unwrap(), 750);
        assert_matches!(line_subtotal(i64::MAX, 2), Err(ColectaError::Validation(_)));
    }
}
