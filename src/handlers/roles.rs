//! `/roles` and `/permisos` routes, including the role's permission set
//!
//! Every write that can change what a user is allowed to do drops the
//! affected cached permission sets.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::info;

use super::{crud, Payload};
use crate::app::AppState;
use crate::database::Resource;
use crate::middleware::Authenticated;
use crate::models::{
    AssignPermissionsRequest, Permission, Role, UpdatePermissionRequest, UpdateRoleRequest, Validate,
};
use crate::utils::errors::{ColectaError, Result};

pub fn router() -> Router<AppState> {
    crud::read_routes::<Role>()
        .route("/create", post(crud::create::<Role>))
        .route("/update/:id", put(update_role))
        .route("/delete/:id", delete(deactivate_role))
        .route("/:id/permisos", get(permissions).put(replace_permissions))
}

pub fn permission_router() -> Router<AppState> {
    crud::read_routes::<Permission>()
        .route("/create", post(crud::create::<Permission>))
        .route("/update/:id", put(update_permission))
        .route("/delete/:id", delete(deactivate_permission))
}

async fn update_role(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<i64>,
    request: Payload<UpdateRoleRequest>,
) -> Result<Json<Role>> {
    let role = crud::update::<Role>(State(state.clone()), caller, Path(id), request).await?;
    state.services.auth_service.invalidate_role(id).await?;
    Ok(role)
}

async fn deactivate_role(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Role>> {
    let role = crud::deactivate::<Role>(State(state.clone()), caller, Path(id)).await?;
    state.services.auth_service.invalidate_role(id).await?;
    Ok(role)
}

async fn update_permission(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<i64>,
    request: Payload<UpdatePermissionRequest>,
) -> Result<Json<Permission>> {
    let permission = crud::update::<Permission>(State(state.clone()), caller, Path(id), request).await?;
    state.services.auth_service.invalidate_all().await;
    Ok(permission)
}

async fn deactivate_permission(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Permission>> {
    let permission = crud::deactivate::<Permission>(State(state.clone()), caller, Path(id)).await?;
    state.services.auth_service.invalidate_all().await;
    Ok(permission)
}

async fn permissions(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Permission>>> {
    state
        .db
        .crud::<Role>()
        .find_by_id(id)
        .await?
        .ok_or(ColectaError::NotFound { resource: Role::NAME, id })?;

    Ok(Json(state.db.roles.permissions(id).await?))
}

async fn replace_permissions(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<AssignPermissionsRequest>,
) -> Result<Json<Vec<Permission>>> {
    caller.require(&Role::permission())?;
    request.validate()?;

    let permissions = state.db.roles.replace_permissions(id, &request.permiso_ids).await?;
    state.services.auth_service.invalidate_role(id).await?;

    info!(role_id = id, count = permissions.len(), user_id = caller.user_id, "Role permissions replaced");
    Ok(Json(permissions))
}
