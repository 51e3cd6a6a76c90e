//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::{is_valid_username, require_id};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub persona_id: Option<i64>,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role_id: i64,
    pub estado: i16,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.estado == super::ESTADO_ACTIVO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub persona_id: Option<i64>,
    pub username: String,
    pub password: String,
    pub role_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub persona_id: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i64>,
    pub estado: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

fn validate_username(username: &str) -> Result<()> {
    if !is_valid_username(username) {
        return Err(ColectaError::validation(
            "username must be 3 to 30 letters, digits, '_' or '.'",
        ));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ColectaError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        require_id("role_id", self.role_id)?;
        if let Some(persona_id) = self.persona_id {
            require_id("persona_id", persona_id)?;
        }
        Ok(())
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        if let Some(role_id) = self.role_id {
            require_id("role_id", role_id)?;
        }
        if let Some(persona_id) = self.persona_id {
            require_id("persona_id", persona_id)?;
        }
        validate_estado(self.estado)
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<()> {
        validate_password(&self.new_password)?;
        if self.current_password == self.new_password {
            return Err(ColectaError::validation(
                "new password must differ from the current one",
            ));
        }
        Ok(())
    }
}
