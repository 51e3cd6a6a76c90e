//! Generic routes shared by every plain resource
//!
//! `GET /`, `GET /activos` and `GET /:id` need an authenticated caller;
//! `POST /create`, `PUT /update/:id` and `DELETE /delete/:id` also need the
//! resource's `<path>.gestionar` permission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::info;

use super::Payload;
use crate::app::AppState;
use crate::database::Resource;
use crate::middleware::Authenticated;
use crate::models::Validate;
use crate::utils::errors::{ColectaError, Result};

/// Read-only routes of a resource
pub fn read_routes<T: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>))
        .route("/activos", get(list_active::<T>))
        .route("/:id", get(get_one::<T>))
}

/// All six routes of a resource
pub fn crud_routes<T: Resource>() -> Router<AppState> {
    read_routes::<T>()
        .route("/create", post(create::<T>))
        .route("/update/:id", put(update::<T>))
        .route("/delete/:id", delete(deactivate::<T>))
}

fn not_found<T: Resource>(id: i64) -> ColectaError {
    ColectaError::NotFound { resource: T::NAME, id }
}

pub async fn list<T: Resource>(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<T>>> {
    Ok(Json(state.db.crud::<T>().list().await?))
}

pub async fn list_active<T: Resource>(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<T>>> {
    Ok(Json(state.db.crud::<T>().list_active().await?))
}

pub async fn get_one<T: Resource>(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<T>> {
    state
        .db
        .crud::<T>()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<T>(id))
}

pub async fn create<T: Resource>(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<T::Create>,
) -> Result<(StatusCode, Json<T>)> {
    caller.require(&T::permission())?;
    request.validate()?;

    let row = state.db.crud::<T>().create(request).await?;
    info!(resource = T::NAME, user_id = caller.user_id, "Record created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update<T: Resource>(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<T::Update>,
) -> Result<Json<T>> {
    caller.require(&T::permission())?;
    request.validate()?;

    let row = state
        .db
        .crud::<T>()
        .update(id, request)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    info!(resource = T::NAME, id = id, user_id = caller.user_id, "Record updated");
    Ok(Json(row))
}

pub async fn deactivate<T: Resource>(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<T>> {
    caller.require(&T::permission())?;

    let row = state
        .db
        .crud::<T>()
        .deactivate(id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    info!(resource = T::NAME, id = id, user_id = caller.user_id, "Record deactivated");
    Ok(Json(row))
}
