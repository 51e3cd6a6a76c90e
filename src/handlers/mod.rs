//! HTTP handlers module
//!
//! Routers grouped by resource. Plain resources reuse the generic routes in
//! [`crud`]; documents with stock effects, raffles, accounts and reports get
//! their own handlers.

pub mod auth;
pub mod crud;
pub mod health;
pub mod inventory;
pub mod notifications;
pub mod raffles;
pub mod reports;
pub mod roles;
pub mod stands;
pub mod uploads;
pub mod users;

use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

use crate::app::AppState;
use crate::database::Resource;
use crate::models::{
    Event, InventoryItem, Notification, Permission, Person, Product, Raffle, Role, Stand, TicketBook,
    Volunteer,
};
use crate::utils::errors::{ColectaError, Result};

/// JSON body whose rejections use the application's error body (400)
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ColectaError;

    async fn from_request(request: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ColectaError::validation(rejection.body_text()))?;
        Ok(Payload(value))
    }
}

fn mount<T: Resource>(router: Router<AppState>, routes: Router<AppState>) -> Router<AppState> {
    router.nest(&format!("/{}", T::PATH), routes)
}

/// Every API route, without the outer layers
pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    let router = Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/usuarios", users::router())
        .nest("/traslados", inventory::transfer_router())
        .nest("/pedidos", inventory::order_router())
        .nest("/ventas", inventory::sale_router())
        .nest("/reportes", reports::router());

    let router = mount::<Person>(router, crud::crud_routes::<Person>());
    let router = mount::<Permission>(router, roles::permission_router());
    let router = mount::<Volunteer>(router, crud::crud_routes::<Volunteer>());
    let router = mount::<Product>(
        router,
        crud::crud_routes::<Product>().merge(uploads::product_routes(max_upload_bytes)),
    );
    let router = mount::<Event>(
        router,
        crud::crud_routes::<Event>().merge(uploads::event_routes(max_upload_bytes)),
    );

    let router = mount::<Role>(router, roles::router());
    let router = mount::<Stand>(router, stands::router());
    let router = mount::<InventoryItem>(router, stands::inventory_router());
    let router = mount::<Raffle>(router, raffles::raffle_router());
    let router = mount::<TicketBook>(router, raffles::ticket_book_router());
    mount::<Notification>(router, notifications::router())
}
