//! Volunteer model and stand assignments

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::Result;
use crate::utils::helpers::{optional_text, require_id};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Volunteer {
    pub id: i64,
    pub persona_id: i64,
    pub skills: Option<String>,
    pub availability: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVolunteerRequest {
    pub persona_id: i64,
    pub skills: Option<String>,
    pub availability: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVolunteerRequest {
    pub persona_id: Option<i64>,
    pub skills: Option<String>,
    pub availability: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub estado: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StandAssignment {
    pub stand_id: i64,
    pub voluntario_id: i64,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignVolunteerRequest {
    pub voluntario_id: i64,
}

impl Validate for CreateVolunteerRequest {
    fn validate(&self) -> Result<()> {
        require_id("persona_id", self.persona_id)?;
        optional_text("skills", self.skills.as_deref(), 500)?;
        optional_text("availability", self.availability.as_deref(), 255)
    }
}

impl Validate for UpdateVolunteerRequest {
    fn validate(&self) -> Result<()> {
        if let Some(persona_id) = self.persona_id {
            require_id("persona_id", persona_id)?;
        }
        optional_text("skills", self.skills.as_deref(), 500)?;
        optional_text("availability", self.availability.as_deref(), 255)?;
        validate_estado(self.estado)
    }
}

impl Validate for AssignVolunteerRequest {
    fn validate(&self) -> Result<()> {
        require_id("voluntario_id", self.voluntario_id)
    }
}
