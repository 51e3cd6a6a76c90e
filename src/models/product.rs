//! Product and stand inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::Result;
use crate::utils::helpers::{optional_text, require_id, require_non_negative, require_text};

/// A product; `stock` is the warehouse quantity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub image_path: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub estado: Option<i16>,
}

/// Quantity of a product held by a stand (`detalle_productos`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub stand_id: i64,
    pub producto_id: i64,
    pub quantity: i64,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inventory row joined with product data
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryLine {
    pub id: i64,
    pub stand_id: i64,
    pub producto_id: i64,
    pub product_name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub stand_id: i64,
    pub producto_id: i64,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInventoryItemRequest {
    pub quantity: Option<i64>,
    pub estado: Option<i16>,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name, 150)?;
        optional_text("description", self.description.as_deref(), 1000)?;
        require_non_negative("price_cents", self.price_cents)?;
        require_non_negative("stock", self.stock)
    }
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref(), 150)?;
        optional_text("description", self.description.as_deref(), 1000)?;
        if let Some(price) = self.price_cents {
            require_non_negative("price_cents", price)?;
        }
        if let Some(stock) = self.stock {
            require_non_negative("stock", stock)?;
        }
        validate_estado(self.estado)
    }
}

impl Validate for CreateInventoryItemRequest {
    fn validate(&self) -> Result<()> {
        require_id("stand_id", self.stand_id)?;
        require_id("producto_id", self.producto_id)?;
        require_non_negative("quantity", self.quantity)
    }
}

impl Validate for UpdateInventoryItemRequest {
    fn validate(&self) -> Result<()> {
        if let Some(quantity) = self.quantity {
            require_non_negative("quantity", quantity)?;
        }
        validate_estado(self.estado)
    }
}
