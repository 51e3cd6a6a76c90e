//! Detail lines submitted with transfers, orders and sales

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::{require_id, require_positive};

/// One submitted detail line. `id` is set when the line already exists and
/// should be kept (possibly with a new quantity) on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub id: Option<i64>,
    pub producto_id: i64,
    pub quantity: i64,
}

impl LineInput {
    pub fn new(producto_id: i64, quantity: i64) -> Self {
        Self { id: None, producto_id, quantity }
    }
}

/// At least one line, positive quantities, each product at most once
pub fn validate_lines(lines: &[LineInput]) -> Result<()> {
    if lines.is_empty() {
        return Err(ColectaError::validation("detalles must contain at least one line"));
    }

    let mut products = HashSet::new();
    let mut ids = HashSet::new();
    for line in lines {
        require_id("producto_id", line.producto_id)?;
        require_positive("quantity", line.quantity)?;
        if !products.insert(line.producto_id) {
            return Err(ColectaError::validation(format!(
                "product {} appears more than once in detalles",
                line.producto_id
            )));
        }
        if let Some(id) = line.id {
            require_id("id", id)?;
            if !ids.insert(id) {
                return Err(ColectaError::validation(format!(
                    "line {} appears more than once in detalles",
                    id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_lines() {
        assert!(validate_lines(&[]).is_err());
        assert!(validate_lines(&[LineInput::new(1, 2), LineInput::new(2, 1)]).is_ok());
        assert!(validate_lines(&[LineInput::new(1, 0)]).is_err());
        assert!(validate_lines(&[LineInput::new(1, 2), LineInput::new(1, 3)]).is_err());

        let duplicated_id = [
            LineInput { id: Some(4), producto_id: 1, quantity: 1 },
            LineInput { id: Some(4), producto_id: 2, quantity: 1 },
        ];
        assert!(validate_lines(&duplicated_id).is_err());
    }
}
