//! Test data builders
//!
//! JSON payloads for the create routes, with `fake` supplying realistic
//! names and contact data.

use chrono::{Duration, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

/// A unique username that satisfies the username rules
pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &suffix[..10])
}

pub fn person_payload() -> Value {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email: String = SafeEmail().fake();
    let street: String = StreetName().fake();
    let document: u32 = (10_000_000..99_999_999).fake();

    json!({
        "first_name": first_name,
        "last_name": last_name,
        "document": document.to_string(),
        "email": email,
        "phone": "+54 11 5555-1234",
        "address": street,
    })
}

pub fn event_payload() -> Value {
    let starts_at = Utc::now() + Duration::days(7);
    let word: String = Word().fake();
    json!({
        "name": format!("Feria {}", word),
        "location": "Plaza Central",
        "starts_at": starts_at,
        "ends_at": starts_at + Duration::hours(8),
    })
}

pub fn stand_payload(evento_id: i64) -> Value {
    let word: String = Word().fake();
    json!({ "evento_id": evento_id, "name": format!("Stand {}", word) })
}

pub fn product_payload(price_cents: i64, stock: i64) -> Value {
    let word: String = Word().fake();
    json!({
        "name": format!("Producto {} {}", word, Uuid::new_v4().simple()),
        "price_cents": price_cents,
        "stock": stock,
    })
}

pub fn raffle_payload(ticket_price_cents: i64) -> Value {
    json!({
        "name": "Rifa solidaria",
        "prize": "Bicicleta",
        "ticket_price_cents": ticket_price_cents,
    })
}

/// Detail lines from `(producto_id, quantity)` pairs
pub fn lines(items: &[(i64, i64)]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|(producto_id, quantity)| json!({ "producto_id": producto_id, "quantity": quantity }))
            .collect(),
    )
}
