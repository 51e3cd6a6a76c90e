//! `/rifas` and `/talonarios` routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use super::{crud, Payload};
use crate::app::AppState;
use crate::database::Resource;
use crate::middleware::Authenticated;
use crate::models::{
    CreateTicketBookRequest, Raffle, RaffleSummary, SellTicketsRequest, TicketBook, UpdateTicketBookRequest,
};
use crate::utils::errors::Result;

pub fn raffle_router() -> Router<AppState> {
    crud::crud_routes::<Raffle>().route("/:id/resumen", get(summary))
}

/// Ticket books keep the generic reads and soft delete; writes check ranges
pub fn ticket_book_router() -> Router<AppState> {
    crud::read_routes::<TicketBook>()
        .route("/create", post(create_ticket_book))
        .route("/update/:id", put(update_ticket_book))
        .route("/delete/:id", delete(crud::deactivate::<TicketBook>))
        .route("/rifa/:id", get(by_raffle))
        .route("/voluntario/:id", get(by_volunteer))
        .route("/vender/:id", put(sell_tickets))
}

async fn summary(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<RaffleSummary>> {
    Ok(Json(state.services.raffle_service.summary(id).await?))
}

async fn create_ticket_book(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Payload(request): Payload<CreateTicketBookRequest>,
) -> Result<(StatusCode, Json<TicketBook>)> {
    caller.require(&TicketBook::permission())?;
    let book = state.services.raffle_service.create_ticket_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_ticket_book(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<UpdateTicketBookRequest>,
) -> Result<Json<TicketBook>> {
    caller.require(&TicketBook::permission())?;
    Ok(Json(state.services.raffle_service.update_ticket_book(id, request).await?))
}

async fn by_raffle(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(rifa_id): Path<i64>,
) -> Result<Json<Vec<TicketBook>>> {
    Ok(Json(state.db.raffles.ticket_books_by_raffle(rifa_id).await?))
}

async fn by_volunteer(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(voluntario_id): Path<i64>,
) -> Result<Json<Vec<TicketBook>>> {
    Ok(Json(state.db.raffles.ticket_books_by_volunteer(voluntario_id).await?))
}

async fn sell_tickets(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    Payload(request): Payload<SellTicketsRequest>,
) -> Result<Json<TicketBook>> {
    caller.require(&TicketBook::permission())?;
    Ok(Json(state.services.raffle_service.sell_tickets(id, request).await?))
}
