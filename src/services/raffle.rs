//! Ticket book rules
//!
//! Ticket ranges of one raffle may not overlap and a book never sells more
//! tickets than it holds. Every write locks the raffle row first so that
//! concurrent assignments for the same raffle are serialized.

use sqlx::PgPool;
use tracing::info;

use crate::database::repositories::CrudRepository;
use crate::database::RaffleRepository;
use crate::models::raffle::validate_ticket_range;
use crate::models::{
    CreateTicketBookRequest, RaffleSummary, SellTicketsRequest, TicketBook, UpdateTicketBookRequest,
    Validate, Volunteer, ESTADO_ACTIVO,
};
use crate::utils::errors::{ColectaError, Result};

#[derive(Clone, Debug)]
pub struct RaffleService {
    pool: PgPool,
    raffles: RaffleRepository,
}

fn overlap_error(rifa_id: i64, existing: &TicketBook) -> ColectaError {
    ColectaError::Conflict(format!(
        "tickets overlap talonario {} ({}-{}) of rifa {}",
        existing.id, existing.first_number, existing.last_number, rifa_id
    ))
}

impl RaffleService {
    pub fn new(pool: PgPool, raffles: RaffleRepository) -> Self {
        Self { pool, raffles }
    }

    pub async fn summary(&self, rifa_id: i64) -> Result<RaffleSummary> {
        self.raffles.summary(rifa_id).await.map_err(|e| match e {
            ColectaError::Database(sqlx::Error::RowNotFound) => {
                ColectaError::NotFound { resource: "rifa", id: rifa_id }
            }
            other => other,
        })
    }

    /// Assign a ticket range of an active raffle to an active volunteer
    pub async fn create_ticket_book(&self, request: CreateTicketBookRequest) -> Result<TicketBook> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let raffle = RaffleRepository::lock_raffle(&mut *tx, request.rifa_id)
            .await?
            .filter(|raffle| raffle.estado == ESTADO_ACTIVO)
            .ok_or(ColectaError::NotFound { resource: "rifa", id: request.rifa_id })?;

        CrudRepository::<Volunteer>::find_in(&mut *tx, request.voluntario_id)
            .await?
            .filter(|volunteer| volunteer.estado == ESTADO_ACTIVO)
            .ok_or(ColectaError::NotFound { resource: "voluntario", id: request.voluntario_id })?;

        if let Some(existing) = RaffleRepository::find_overlapping(
            &mut *tx,
            raffle.id,
            request.first_number,
            request.last_number,
            None,
        )
        .await?
        {
            return Err(overlap_error(raffle.id, &existing));
        }

        let book = CrudRepository::<TicketBook>::insert_in(&mut *tx, request).await?;
        tx.commit().await?;

        info!(
            talonario_id = book.id,
            rifa_id = book.rifa_id,
            first = book.first_number,
            last = book.last_number,
            "Ticket book assigned"
        );
        Ok(book)
    }

    /// Change volunteer, range or sold count; the merged book is re-checked
    pub async fn update_ticket_book(&self, id: i64, request: UpdateTicketBookRequest) -> Result<TicketBook> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = RaffleRepository::lock_ticket_book(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "talonario", id })?;
        RaffleRepository::lock_raffle(&mut *tx, current.rifa_id).await?;

        if let Some(voluntario_id) = request.voluntario_id {
            CrudRepository::<Volunteer>::find_in(&mut *tx, voluntario_id)
                .await?
                .filter(|volunteer| volunteer.estado == ESTADO_ACTIVO)
                .ok_or(ColectaError::NotFound { resource: "voluntario", id: voluntario_id })?;
        }

        let first = request.first_number.unwrap_or(current.first_number);
        let last = request.last_number.unwrap_or(current.last_number);
        let sold = request.sold_count.unwrap_or(current.sold_count);
        validate_ticket_range(first, last, sold)?;

        let becomes_active = request.estado.unwrap_or(current.estado) == ESTADO_ACTIVO;
        if becomes_active {
            if let Some(existing) =
                RaffleRepository::find_overlapping(&mut *tx, current.rifa_id, first, last, Some(id)).await?
            {
                return Err(overlap_error(current.rifa_id, &existing));
            }
        }

        let book = CrudRepository::<TicketBook>::update_in(&mut *tx, id, request)
            .await?
            .ok_or(ColectaError::NotFound { resource: "talonario", id })?;
        tx.commit().await?;

        info!(talonario_id = id, "Ticket book updated");
        Ok(book)
    }

    /// Register sold tickets of a book
    pub async fn sell_tickets(&self, id: i64, request: SellTicketsRequest) -> Result<TicketBook> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = RaffleRepository::lock_ticket_book(&mut *tx, id)
            .await?
            .ok_or(ColectaError::NotFound { resource: "talonario", id })?;
        if current.estado != ESTADO_ACTIVO {
            return Err(ColectaError::Conflict(format!("talonario {} is inactive", id)));
        }
        if request.quantity > current.remaining() {
            return Err(ColectaError::validation(format!(
                "only {} tickets remain in talonario {}",
                current.remaining(),
                id
            )));
        }

        let book = RaffleRepository::add_sold(&mut *tx, id, request.quantity).await?;
        tx.commit().await?;

        info!(talonario_id = id, sold = request.quantity, total_sold = book.sold_count, "Tickets sold");
        Ok(book)
    }
}
