//! Event and stand models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::Result;
use crate::utils::helpers::{optional_text, require_id, require_text, validate_range};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub image_path: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub estado: Option<i16>,
}

/// A sales/exhibition booth that belongs to an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stand {
    pub id: i64,
    pub evento_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStandRequest {
    pub evento_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStandRequest {
    pub evento_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub estado: Option<i16>,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name, 150)?;
        optional_text("location", self.location.as_deref(), 200)?;
        validate_range(self.starts_at, self.ends_at)
    }
}

impl Validate for UpdateEventRequest {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref(), 150)?;
        optional_text("location", self.location.as_deref(), 200)?;
        // Partial updates are re-checked against the stored row after merging
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            validate_range(start, end)?;
        }
        validate_estado(self.estado)
    }
}

impl Validate for Event {
    fn validate(&self) -> Result<()> {
        validate_range(self.starts_at, self.ends_at)
    }
}

impl Validate for CreateStandRequest {
    fn validate(&self) -> Result<()> {
        require_id("evento_id", self.evento_id)?;
        require_text("name", &self.name, 100)?;
        optional_text("location", self.location.as_deref(), 200)
    }
}

impl Validate for UpdateStandRequest {
    fn validate(&self) -> Result<()> {
        if let Some(evento_id) = self.evento_id {
            require_id("evento_id", evento_id)?;
        }
        optional_text("name", self.name.as_deref(), 100)?;
        optional_text("location", self.location.as_deref(), 200)?;
        validate_estado(self.estado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_event_range_validation() {
        let start = Utc::now();
        let request = CreateEventRequest {
            name: "Feria de primavera".to_string(),
            description: None,
            location: Some("Plaza central".to_string()),
            starts_at: start,
            ends_at: start + Duration::hours(6),
        };
        assert!(request.validate().is_ok());

        let backwards = CreateEventRequest {
            ends_at: start - Duration::hours(1),
            ..request
        };
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn test_partial_update_only_checks_given_range() {
        let request = UpdateEventRequest {
            ends_at: Some(Utc::now()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
