//! Authentication middleware
//!
//! Resolves the `Authorization: Bearer <token>` header of a request into the
//! caller's [`AuthContext`]. Handlers opt in by taking [`Authenticated`] as
//! an argument.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::app::AppState;
use crate::services::auth::AuthContext;
use crate::utils::errors::{ColectaError, Result};

/// Extractor for the authenticated caller
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

/// Token part of a bearer authorization header
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ColectaError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ColectaError::Unauthorized("missing bearer token".to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| ColectaError::Unauthorized("malformed authorization header".to_string()))?;

        let context = state.services.auth_service.authenticate(token).await?;
        debug!(user_id = context.user_id, path = %parts.uri.path(), "Request authenticated");
        Ok(Authenticated(context))
    }
}
