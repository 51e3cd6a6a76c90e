//! `/traslados`, `/pedidos` and `/ventas` routes
//!
//! Every response carries the document header together with its `detalles`.
//! Writes go through [`InventoryService`](crate::services::InventoryService)
//! so stock is adjusted in the same transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use super::Payload;
use crate::app::AppState;
use crate::middleware::Authenticated;
use crate::models::{OrderRequest, OrderWithLines, SaleRequest, SaleWithLines, TransferRequest, TransferWithLines};
use crate::utils::errors::{ColectaError, Result};

pub const MANAGE_TRANSFERS: &str = "traslados.gestionar";
pub const MANAGE_ORDERS: &str = "pedidos.gestionar";
pub const MANAGE_SALES: &str = "ventas.gestionar";

pub fn transfer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transfers))
        .route("/activos", get(list_active_transfers))
        .route("/:id", get(get_transfer))
        .route("/create", post(create_transfer))
        .route("/update/:id", put(update_transfer))
        .route("/delete/:id", delete(delete_transfer))
}

pub fn order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/activos", get(list_active_orders))
        .route("/stand/:id", get(orders_by_stand))
        .route("/:id", get(get_order))
        .route("/create", post(create_order))
        .route("/update/:id", put(update_order))
        .route("/delete/:id", delete(delete_order))
}

pub fn sale_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/activos", get(list_active_sales))
        .route("/stand/:id", get(sales_by_stand))
        .route("/:id", get(get_sale))
        .route("/create", post(create_sale))
        .route("/update/:id", put(update_sale))
        .route("/delete/:id", delete(delete_sale))
}

// Transfers

async fn list_transfers(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<TransferWithLines>>> {
    Ok(Json(state.db.transfers.list().await?))
}

async fn list_active_transfers(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<TransferWithLines>>> {
    Ok(Json(state.db.transfers.list_active().await?))
}

async fn get_transfer(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<TransferWithLines>> {
    state
        .db
        .transfers
        .find(id)
        .await?
        .map(Json)
        .ok_or(ColectaError::NotFound { resource: "traslado", id })
}

async fn create_transfer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<TransferRequest>,
) -> Result<(StatusCode, Json<TransferWithLines>)> {
    caller.require(MANAGE_TRANSFERS)?;
    let transfer = state.services.inventory_service.create_transfer(request).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

async fn update_transfer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<TransferRequest>,
) -> Result<Json<TransferWithLines>> {
    caller.require(MANAGE_TRANSFERS)?;
    Ok(Json(state.services.inventory_service.update_transfer(id, request).await?))
}

async fn delete_transfer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<TransferWithLines>> {
    caller.require(MANAGE_TRANSFERS)?;
    Ok(Json(state.services.inventory_service.delete_transfer(id).await?))
}

// Orders

async fn list_orders(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<OrderWithLines>>> {
    Ok(Json(state.db.orders.list().await?))
}

async fn list_active_orders(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<OrderWithLines>>> {
    Ok(Json(state.db.orders.list_active().await?))
}

async fn orders_by_stand(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(stand_id): Path<i64>,
) -> Result<Json<Vec<OrderWithLines>>> {
    Ok(Json(state.db.orders.by_stand(stand_id).await?))
}

async fn get_order(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<OrderWithLines>> {
    state
        .db
        .orders
        .find(id)
        .await?
        .map(Json)
        .ok_or(ColectaError::NotFound { resource: "pedido", id })
}

async fn create_order(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<OrderRequest>,
) -> Result<(StatusCode, Json<OrderWithLines>)> {
    caller.require(MANAGE_ORDERS)?;
    let order = state.services.inventory_service.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_order(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<OrderRequest>,
) -> Result<Json<OrderWithLines>> {
    caller.require(MANAGE_ORDERS)?;
    Ok(Json(state.services.inventory_service.update_order(id, request).await?))
}

async fn delete_order(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<OrderWithLines>> {
    caller.require(MANAGE_ORDERS)?;
    Ok(Json(state.services.inventory_service.delete_order(id).await?))
}

// Sales

async fn list_sales(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<SaleWithLines>>> {
    Ok(Json(state.db.sales.list().await?))
}

async fn list_active_sales(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<SaleWithLines>>> {
    Ok(Json(state.db.sales.list_active().await?))
}

async fn sales_by_stand(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(stand_id): Path<i64>,
) -> Result<Json<Vec<SaleWithLines>>> {
    Ok(Json(state.db.sales.by_stand(stand_id).await?))
}

async fn get_sale(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<SaleWithLines>> {
    state
        .db
        .sales
        .find(id)
        .await?
        .map(Json)
        .ok_or(ColectaError::NotFound { resource: "venta", id })
}

async fn create_sale(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<SaleRequest>,
) -> Result<(StatusCode, Json<SaleWithLines>)> {
    caller.require(MANAGE_SALES)?;
    let sale = state.services.inventory_service.create_sale(request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn update_sale(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<SaleRequest>,
) -> Result<Json<SaleWithLines>> {
    caller.require(MANAGE_SALES)?;
    Ok(Json(state.services.inventory_service.update_sale(id, request).await?))
}

async fn delete_sale(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<SaleWithLines>> {
    caller.require(MANAGE_SALES)?;
    Ok(Json(state.services.inventory_service.delete_sale(id).await?))
}
