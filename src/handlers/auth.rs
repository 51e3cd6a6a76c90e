//! Login and current-user routes

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::Payload;
use crate::app::AppState;
use crate::middleware::Authenticated;
use crate::models::{LoginRequest, LoginResponse, User};
use crate::utils::errors::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub permissions: Vec<String>,
}

async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(state.services.auth_service.login(request).await?))
}

async fn me(State(state): State<AppState>, Authenticated(caller): Authenticated) -> Result<Json<MeResponse>> {
    let user = state.services.user_service.get(caller.user_id).await?;
    let mut permissions: Vec<String> = caller.permissions.into_iter().collect();
    permissions.sort();

    Ok(Json(MeResponse { user, permissions }))
}
