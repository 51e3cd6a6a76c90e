//! `/notificaciones` routes
//!
//! Writes go through the generic handlers. Reads are scoped to the caller:
//! listing every notification needs `notificaciones.gestionar`, a single one is
//! visible to its recipient, to everybody when it is a broadcast, and otherwise
//! only with that permission.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use super::crud;
use crate::app::AppState;
use crate::middleware::Authenticated;
use crate::models::Notification;
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/activos", get(list_active))
        .route("/:id", get(get_one))
        .route("/create", post(crud::create::<Notification>))
        .route("/update/:id", put(crud::update::<Notification>))
        .route("/delete/:id", delete(crud::deactivate::<Notification>))
        .route("/usuario/:id", get(inbox))
        .route("/leer/:id", put(mark_read))
}

async fn list(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.services.notification_service.list(&caller, false).await?))
}

async fn list_active(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.services.notification_service.list(&caller, true).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(state.services.notification_service.get(&caller, id).await?))
}

async fn inbox(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(usuario_id): Path<i64>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.services.notification_service.inbox(&caller, usuario_id).await?))
}

async fn mark_read(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(state.services.notification_service.mark_read(&caller, id).await?))
}
