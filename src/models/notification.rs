//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::Result;
use crate::utils::helpers::{optional_text, require_id, require_text};

/// A message for one user, or for everyone when `usuario_id` is empty
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub usuario_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_broadcast(&self) -> bool {
        self.usuario_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub usuario_id: Option<i64>,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub estado: Option<i16>,
}

impl Validate for CreateNotificationRequest {
    fn validate(&self) -> Result<()> {
        if let Some(usuario_id) = self.usuario_id {
            require_id("usuario_id", usuario_id)?;
        }
        require_text("title", &self.title, 150)?;
        require_text("message", &self.message, 2000)
    }
}

impl Validate for UpdateNotificationRequest {
    fn validate(&self) -> Result<()> {
        optional_text("title", self.title.as_deref(), 150)?;
        optional_text("message", self.message.as_deref(), 2000)?;
        validate_estado(self.estado)
    }
}
