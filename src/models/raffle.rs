//! Raffle (`rifa`) and ticket book (`talonario`) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{validate_estado, Validate};
use crate::utils::errors::{ColectaError, Result};
use crate::utils::helpers::{optional_text, require_id, require_non_negative, require_positive, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Raffle {
    pub id: i64,
    pub evento_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub prize: Option<String>,
    pub ticket_price_cents: i64,
    pub draw_at: Option<DateTime<Utc>>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRaffleRequest {
    pub evento_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub prize: Option<String>,
    pub ticket_price_cents: i64,
    pub draw_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRaffleRequest {
    pub evento_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prize: Option<String>,
    pub ticket_price_cents: Option<i64>,
    pub draw_at: Option<DateTime<Utc>>,
    pub estado: Option<i16>,
}

/// A numbered range of raffle tickets handed to one volunteer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketBook {
    pub id: i64,
    pub rifa_id: i64,
    pub voluntario_id: i64,
    pub first_number: i64,
    pub last_number: i64,
    pub sold_count: i64,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketBook {
    /// Number of tickets in the book
    pub fn size(&self) -> i64 {
        range_size(self.first_number, self.last_number)
    }

    pub fn remaining(&self) -> i64 {
        self.size().saturating_sub(self.sold_count)
    }
}

/// Highest ticket number a book may hold
pub const MAX_TICKET_NUMBER: i64 = 999_999_999;

/// Inclusive size of a ticket number range, saturating at `i64::MAX`
pub fn range_size(first: i64, last: i64) -> i64 {
    last.saturating_sub(first).saturating_add(1)
}

/// Whether two inclusive ticket ranges share at least one number
pub fn ranges_overlap(a: (i64, i64), b: (i64, i64)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Check a ticket range and a sold count against each other
pub fn validate_ticket_range(first: i64, last: i64, sold_count: i64) -> Result<()> {
    require_non_negative("first_number", first)?;
    if last > MAX_TICKET_NUMBER {
        return Err(ColectaError::validation(format!(
            "last_number cannot be higher than {}",
            MAX_TICKET_NUMBER
        )));
    }
    if last < first {
        return Err(ColectaError::validation(
            "last_number cannot be lower than first_number",
        ));
    }
    require_non_negative("sold_count", sold_count)?;
    let size = range_size(first, last);
    if sold_count > size {
        return Err(ColectaError::validation(format!(
            "sold_count {} exceeds the {} tickets of the book",
            sold_count, size
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketBookRequest {
    pub rifa_id: i64,
    pub voluntario_id: i64,
    pub first_number: i64,
    pub last_number: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTicketBookRequest {
    pub voluntario_id: Option<i64>,
    pub first_number: Option<i64>,
    pub last_number: Option<i64>,
    pub sold_count: Option<i64>,
    pub estado: Option<i16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellTicketsRequest {
    pub quantity: i64,
}

/// Aggregated ticket figures for one raffle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RaffleSummary {
    pub rifa_id: i64,
    pub ticket_books: i64,
    pub tickets_assigned: i64,
    pub tickets_sold: i64,
    pub amount_collected_cents: i64,
}

impl Validate for CreateRaffleRequest {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name, 150)?;
        optional_text("prize", self.prize.as_deref(), 255)?;
        if let Some(evento_id) = self.evento_id {
            require_id("evento_id", evento_id)?;
        }
        require_positive("ticket_price_cents", self.ticket_price_cents)
    }
}

impl Validate for UpdateRaffleRequest {
    fn validate(&self) -> Result<()> {
        optional_text("name", self.name.as_deref(), 150)?;
        optional_text("prize", self.prize.as_deref(), 255)?;
        if let Some(evento_id) = self.evento_id {
            require_id("evento_id", evento_id)?;
        }
        if let Some(price) = self.ticket_price_cents {
            require_positive("ticket_price_cents", price)?;
        }
        validate_estado(self.estado)
    }
}

impl Validate for CreateTicketBookRequest {
    fn validate(&self) -> Result<()> {
        require_id("rifa_id", self.rifa_id)?;
        require_id("voluntario_id", self.voluntario_id)?;
        validate_ticket_range(self.first_number, self.last_number, 0)
    }
}

impl Validate for UpdateTicketBookRequest {
    fn validate(&self) -> Result<()> {
        if let Some(voluntario_id) = self.voluntario_id {
            require_id("voluntario_id", voluntario_id)?;
        }
        if let Some(sold) = self.sold_count {
            require_non_negative("sold_count", sold)?;
        }
        validate_estado(self.estado)
    }
}

impl Validate for SellTicketsRequest {
    fn validate(&self) -> Result<()> {
        require_positive("quantity", self.quantity)
    }
}
