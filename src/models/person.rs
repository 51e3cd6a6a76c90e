//! Person model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::{is_valid_document, optional_text, require_text, validate_email, validate_phone};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePersonRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub estado: Option<i16>,
}

fn validate_document(document: Option<&str>) -> Result<()> {
    match document {
        Some(d) if !is_valid_document(d) => Err(ColectaError::validation(
            "document must be 6 to 15 letters or digits",
        )),
        _ => Ok(()),
    }
}

impl Validate for CreatePersonRequest {
    fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name, 100)?;
        require_text("last_name", &self.last_name, 100)?;
        validate_document(Some(&self.document))?;
        validate_email(self.email.as_deref())?;
        validate_phone(self.phone.as_deref())?;
        optional_text("address", self.address.as_deref(), 200)
    }
}

impl Validate for UpdatePersonRequest {
    fn validate(&self) -> Result<()> {
        optional_text("first_name", self.first_name.as_deref(), 100)?;
        optional_text("last_name", self.last_name.as_deref(), 100)?;
        validate_document(self.document.as_deref())?;
        validate_email(self.email.as_deref())?;
        validate_phone(self.phone.as_deref())?;
        optional_text("address", self.address.as_deref(), 200)?;
        validate_estado(self.estado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePersonRequest {
        CreatePersonRequest {
            first_name: "Lucía".to_string(),
            last_name: "Fernández".to_string(),
            document: "30123456".to_string(),
            email: Some("lucia@example.org".to_string()),
            phone: None,
            birth_date: None,
            address: None,
        }
    }

    #[test]
    fn test_create_validation() {
        assert!(valid_request().validate().is_ok());

        let mut request = valid_request();
        request.document = "12".to_string();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.email = Some("not-an-email".to_string());
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.first_name = " ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_validation() {
        assert!(UpdatePersonRequest::default().validate().is_ok());

        let request = UpdatePersonRequest {
            estado: Some(5),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
