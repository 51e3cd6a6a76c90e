//! Helper functions and utilities
//!
//! Field validators shared by the request payloads, plus a few small
//! formatting helpers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::errors::{ColectaError, Result};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 \-]{7,20}$").expect("valid phone regex"));
static DOCUMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6,15}$").expect("valid document regex"));
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]{3,30}$").expect("valid username regex"));
static PERMISSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]+\.[a-z_]+$").expect("valid permission regex"));

/// Require a non-blank string no longer than `max` characters
pub fn require_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ColectaError::validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > max {
        return Err(ColectaError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Same as [`require_text`] but only when a value is present
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) => require_text(field, v, max),
        None => Ok(()),
    }
}

/// Require a positive database identifier
pub fn require_id(field: &str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(ColectaError::validation(format!("{} must be a positive id", field)));
    }
    Ok(())
}

/// Require a non-negative amount or count
pub fn require_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(ColectaError::validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

/// Require a strictly positive amount or count
pub fn require_positive(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(ColectaError::validation(format!("{} must be greater than zero", field)));
    }
    Ok(())
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate phone number format
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Validate identity document format (6-15 alphanumerics)
pub fn is_valid_document(document: &str) -> bool {
    DOCUMENT_RE.is_match(document)
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Permission names look like `eventos.gestionar`
pub fn is_valid_permission_name(name: &str) -> bool {
    PERMISSION_RE.is_match(name)
}

pub fn validate_email(email: Option<&str>) -> Result<()> {
    match email {
        Some(e) if !is_valid_email(e) => Err(ColectaError::validation("email has an invalid format")),
        _ => Ok(()),
    }
}

pub fn validate_phone(phone: Option<&str>) -> Result<()> {
    match phone {
        Some(p) if !is_valid_phone(p) => Err(ColectaError::validation("phone has an invalid format")),
        _ => Ok(()),
    }
}

/// Validate that `end` does not precede `start`
pub fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(ColectaError::validation("ends_at cannot be before starts_at"));
    }
    Ok(())
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Format an amount of cents as a decimal string (e.g. `1250` -> `12.50`)
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
