//! Role and permission models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::{is_valid_permission_name, optional_text, require_id, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub estado: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub estado: Option<i16>,
}

/// Replaces the full permission set of a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPermissionsRequest {
    pub permiso_ids: Vec<i64>,
}

fn validate_permission_name(name: &str) -> Result<()> {
    require_text("name", name, 60)?;
    if !is_valid_permission_name(name) {
        return Err(ColectaError::validation(
            "permission name must look like 'resource.action'",
        ));
    }
    Ok(())
}

impl Validate for CreateRoleRequest {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name, 60)?;
        optional_text("description", self.description.as_deref(), 255)
    }
}

impl Validate for UpdateRoleRequest {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref(), 60)?;
        optional_text("description", self.description.as_deref(), 255)?;
        validate_estado(self.estado)
    }
}

impl Validate for CreatePermissionRequest {
    fn validate(&self) -> Result<()> {
        validate_permission_name(&self.name)?;
        optional_text("description", self.description.as_deref(), 255)
    }
}

impl Validate for UpdatePermissionRequest {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_permission_name(name)?;
        }
        optional_text("description", self.description.as_deref(), 255)?;
        validate_estado(self.estado)
    }
}

impl Validate for AssignPermissionsRequest {
    fn validate(&self) -> Result<()> {
        for id in &self.permiso_ids {
            require_id("permiso_ids", *id)?;
        }
        Ok(())
    }
}
