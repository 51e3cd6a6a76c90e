//! `/stands` and `/detalle_productos` routes
//!
//! Besides the generic routes a stand lists by event, manages its assigned
//! volunteers and exposes its inventory joined with the product catalogue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::info;

use super::{crud, Payload};
use crate::app::AppState;
use crate::database::Resource;
use crate::middleware::Authenticated;
use crate::models::{
    AssignVolunteerRequest, InventoryItem, InventoryLine, Stand, StandAssignment, Validate, Volunteer,
    ESTADO_ACTIVO,
};
use crate::utils::errors::{ColectaError, Result};

pub fn router() -> Router<AppState> {
    crud::crud_routes::<Stand>()
        .route("/evento/:id", get(by_event))
        .route("/:id/voluntarios", get(volunteers).post(assign_volunteer))
        .route("/:id/voluntarios/:voluntario_id", delete(unassign_volunteer))
}

pub fn inventory_router() -> Router<AppState> {
    crud::crud_routes::<InventoryItem>().route("/stand/:id", get(stand_inventory))
}

async fn require_stand(state: &AppState, id: i64) -> Result<Stand> {
    state
        .db
        .crud::<Stand>()
        .find_by_id(id)
        .await?
        .ok_or(ColectaError::NotFound { resource: Stand::NAME, id })
}

async fn by_event(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(evento_id): Path<i64>,
) -> Result<Json<Vec<Stand>>> {
    Ok(Json(state.db.stands.by_event(evento_id).await?))
}

async fn volunteers(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Volunteer>>> {
    require_stand(&state, id).await?;
    Ok(Json(state.db.stands.volunteers(id).await?))
}

async fn assign_volunteer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<AssignVolunteerRequest>,
) -> Result<(StatusCode, Json<StandAssignment>)> {
    caller.require(&Stand::permission())?;
    request.validate()?;

    let stand = require_stand(&state, id).await?;
    if stand.estado != ESTADO_ACTIVO {
        return Err(ColectaError::NotFound { resource: Stand::NAME, id });
    }
    state
        .db
        .crud::<Volunteer>()
        .find_by_id(request.voluntario_id)
        .await?
        .filter(|volunteer| volunteer.estado == ESTADO_ACTIVO)
        .ok_or(ColectaError::NotFound { resource: Volunteer::NAME, id: request.voluntario_id })?;

    if state.db.stands.is_assigned(id, request.voluntario_id).await? {
        return Err(ColectaError::Conflict(format!(
            "voluntario {} is already assigned to stand {}",
            request.voluntario_id, id
        )));
    }

    let assignment = state.db.stands.assign(id, request.voluntario_id).await?;
    info!(stand_id = id, voluntario_id = request.voluntario_id, "Volunteer assigned to stand");
    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn unassign_volunteer(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path((id, voluntario_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    caller.require(&Stand::permission())?;

    if !state.db.stands.unassign(id, voluntario_id).await? {
        return Err(ColectaError::NotFound { resource: "asignacion", id: voluntario_id });
    }

    info!(stand_id = id, voluntario_id = voluntario_id, "Volunteer removed from stand");
    Ok(StatusCode::NO_CONTENT)
}

async fn stand_inventory(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InventoryLine>>> {
    require_stand(&state, id).await?;
    Ok(Json(state.db.stands.inventory(id).await?))
}
