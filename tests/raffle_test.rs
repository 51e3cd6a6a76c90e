//! Integration tests for raffles, ticket books and ticket sales

#[macro_use]
mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use helpers::*;

async fn volunteer(ctx: &TestContext) -> i64 {
    let persona_id = ctx.create("/personas/create", person_payload()).await;
    ctx.create("/voluntarios/create", json!({ "persona_id": persona_id })).await
}

fn book(rifa_id: i64, voluntario_id: i64, first: i64, last: i64) -> serde_json::Value {
    json!({ "rifa_id": rifa_id, "voluntario_id": voluntario_id, "first_number": first, "last_number": last })
}

#[tokio::test]
#[serial]
async fn test_overlapping_books_conflict() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;

    ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 1, 50)).await;

    let response = ctx.post("/talonarios/create", book(rifa_id, voluntario_id, 50, 100)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx.post("/talonarios/create", book(rifa_id, voluntario_id, 51, 100)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let other_raffle = ctx.create("/rifas/create", raffle_payload(500)).await;
    let response = ctx.post("/talonarios/create", book(other_raffle, voluntario_id, 1, 50)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = ctx.get(&format!("/talonarios/rifa/{}", rifa_id)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = ctx.get(&format!("/talonarios/voluntario/{}", voluntario_id)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_book_range_must_be_ordered() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;

    let response = ctx.post("/talonarios/create", book(rifa_id, voluntario_id, 20, 10)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.post("/talonarios/create", book(999, voluntario_id, 1, 10)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_deactivated_book_frees_its_range() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;

    let first = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 1, 25)).await;
    let response = ctx.delete(&format!("/talonarios/delete/{}", first)).await;
    assert_eq!(response.status, StatusCode::OK);

    let second = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 10, 30)).await;

    let response = ctx
        .put(&format!("/talonarios/update/{}", first), json!({ "estado": 1 }))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx
        .put(&format!("/talonarios/update/{}", second), json!({ "first_number": 26 }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["first_number"], 26);
}

#[tokio::test]
#[serial]
async fn test_selling_tickets_and_summary() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;

    let first = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 1, 10)).await;
    let second = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 11, 30)).await;

    let response = ctx.put(&format!("/talonarios/vender/{}", first), json!({ "quantity": 4 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sold_count"], 4);

    let response = ctx.put(&format!("/talonarios/vender/{}", first), json!({ "quantity": 7 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.put(&format!("/talonarios/vender/{}", first), json!({ "quantity": 0 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    ctx.put(&format!("/talonarios/vender/{}", second), json!({ "quantity": 6 })).await;

    let response = ctx.get(&format!("/rifas/{}/resumen", rifa_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ticket_books"], 2);
    assert_eq!(response.body["tickets_assigned"], 30);
    assert_eq!(response.body["tickets_sold"], 10);
    assert_eq!(response.body["amount_collected_cents"], 5000);

    let response = ctx
        .put(&format!("/talonarios/update/{}", first), json!({ "sold_count": 11 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.get("/rifas/999/resumen").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_inactive_book_cannot_sell() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;
    let id = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 1, 10)).await;

    ctx.delete(&format!("/talonarios/delete/{}", id)).await;

    let response = ctx.put(&format!("/talonarios/vender/{}", id), json!({ "quantity": 1 })).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn test_book_numbers_are_bounded() {
    let ctx = context_or_skip!();
    let rifa_id = ctx.create("/rifas/create", raffle_payload(500)).await;
    let voluntario_id = volunteer(&ctx).await;

    let response = ctx.post("/talonarios/create", book(rifa_id, voluntario_id, 0, i64::MAX)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let id = ctx.create("/talonarios/create", book(rifa_id, voluntario_id, 1, 10)).await;
    let response = ctx
        .put(&format!("/talonarios/update/{}", id), json!({ "last_number": i64::MAX }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.get(&format!("/rifas/{}/resumen", rifa_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tickets_assigned"], 10);
}
