//! `/usuarios` routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use super::Payload;
use crate::app::AppState;
use crate::middleware::Authenticated;
use crate::models::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, User};
use crate::utils::errors::Result;

pub const MANAGE_USERS: &str = "usuarios.gestionar";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/activos", get(list_active))
        .route("/:id", get(get_one))
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(deactivate))
        .route("/password/:id", put(change_password))
}

async fn list(State(state): State<AppState>, Authenticated(_caller): Authenticated) -> Result<Json<Vec<User>>> {
    Ok(Json(state.services.user_service.list().await?))
}

async fn list_active(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
) -> Result<Json<Vec<User>>> {
    Ok(Json(state.services.user_service.list_active().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    Ok(Json(state.services.user_service.get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    caller.require(MANAGE_USERS)?;
    let user = state.services.user_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<UpdateUserRequest>,
) -> Result<Json<User>> {
    caller.require(MANAGE_USERS)?;
    Ok(Json(state.services.user_service.update(id, request).await?))
}

async fn deactivate(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    caller.require(MANAGE_USERS)?;
    Ok(Json(state.services.user_service.deactivate(id).await?))
}

async fn change_password(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<ChangePasswordRequest>,
) -> Result<StatusCode> {
    state
        .services
        .user_service
        .change_password(caller.user_id, id, request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
