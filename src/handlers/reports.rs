//! `/reportes` routes, all gated by `reportes.ver`

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::Resource;
use crate::middleware::Authenticated;
use crate::models::{Event, InventoryValueRow, Product, Stand, StandSalesRow};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::require_non_negative;

pub const VIEW_REPORTS: &str = "reportes.ver";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/eventos/:id/ventas", get(event_sales))
        .route("/stands/:id/inventario", get(stand_inventory))
        .route("/productos/stock-bajo", get(low_stock))
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub umbral: Option<i64>,
}

async fn event_sales(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Vec<StandSalesRow>>> {
    caller.require(VIEW_REPORTS)?;
    state
        .db
        .crud::<Event>()
        .find_by_id(id)
        .await?
        .ok_or(ColectaError::NotFound { resource: Event::NAME, id })?;

    Ok(Json(state.db.reports.event_sales(id).await?))
}

async fn stand_inventory(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InventoryValueRow>>> {
    caller.require(VIEW_REPORTS)?;
    state
        .db
        .crud::<Stand>()
        .find_by_id(id)
        .await?
        .ok_or(ColectaError::NotFound { resource: Stand::NAME, id })?;

    Ok(Json(state.db.reports.stand_inventory_value(id).await?))
}

async fn low_stock(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<Product>>> {
    caller.require(VIEW_REPORTS)?;
    let threshold = query
        .umbral
        .unwrap_or_else(|| state.services.inventory_service.low_stock_threshold());
    require_non_negative("umbral", threshold)?;

    Ok(Json(state.db.reports.low_stock_products(threshold).await?))
}
