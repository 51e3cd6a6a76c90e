//! Stand order (`pedido`) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lines::{validate_lines, LineInput};
use super::Validate;
use crate::utils::errors::Result;
use crate::utils::helpers::{optional_text, require_id};

/// An order moves stock from the warehouse to a stand
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub stand_id: i64,
    pub description: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub id: i64,
    pub pedido_id: i64,
    pub producto_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub detalles: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub stand_id: i64,
    pub description: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub detalles: Vec<LineInput>,
}

impl Validate for OrderRequest {
    fn validate(&self) -> Result<()> {
        require_id("stand_id", self.stand_id)?;
        optional_text("description", self.description.as_deref(), 1000)?;
        validate_lines(&self.detalles)
    }
}
