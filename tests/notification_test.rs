//! Integration tests for notification inboxes and read marks

#[macro_use]
mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;

use helpers::*;

#[tokio::test]
#[serial]
async fn test_inbox_holds_own_and_broadcast_messages() {
    let ctx = context_or_skip!();
    let (alice, alice_token) = ctx.user_with_role(&unique_username("alice"), "voluntario").await;
    let (bob, _) = ctx.user_with_role(&unique_username("bob"), "voluntario").await;

    ctx.create("/notificaciones/create", json!({ "usuario_id": alice, "title": "Turno", "message": "Stand 3 a las 10" }))
        .await;
    ctx.create("/notificaciones/create", json!({ "usuario_id": bob, "title": "Turno", "message": "Stand 1 a las 12" }))
        .await;
    ctx.create("/notificaciones/create", json!({ "title": "Aviso", "message": "Reunión general" }))
        .await;

    let response = ctx
        .request(Method::GET, &format!("/notificaciones/usuario/{}", alice), Some(&alice_token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let inbox = response.body.as_array().unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n["usuario_id"].is_null() || n["usuario_id"] == alice));

    let response = ctx
        .request(Method::GET, &format!("/notificaciones/usuario/{}", bob), Some(&alice_token), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx.get(&format!("/notificaciones/usuario/{}", bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
#[serial]
async fn test_mark_read_only_by_recipient() {
    let ctx = context_or_skip!();
    let (alice, alice_token) = ctx.user_with_role(&unique_username("alice"), "voluntario").await;
    let (_, bob_token) = ctx.user_with_role(&unique_username("bob"), "voluntario").await;

    let id = ctx
        .create("/notificaciones/create", json!({ "usuario_id": alice, "title": "Turno", "message": "Mañana" }))
        .await;

    let response = ctx
        .request(Method::PUT, &format!("/notificaciones/leer/{}", id), Some(&bob_token), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx
        .request(Method::PUT, &format!("/notificaciones/leer/{}", id), Some(&alice_token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["read_at"].is_string());

    let response = ctx
        .request(Method::PUT, "/notificaciones/leer/999", Some(&alice_token), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_sending_needs_permission() {
    let ctx = context_or_skip!();
    let (_, token) = ctx.user_with_role(&unique_username("vol"), "voluntario").await;

    let response = ctx
        .request(
            Method::POST,
            "/notificaciones/create",
            Some(&token),
            Some(json!({ "title": "Hola", "message": "Mensaje" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx
        .post("/notificaciones/create", json!({ "usuario_id": 999, "title": "Hola", "message": "Mensaje" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn test_reads_are_scoped_to_the_recipient() {
    let ctx = context_or_skip!();
    let (alice, alice_token) = ctx.user_with_role(&unique_username("alice"), "voluntario").await;
    let (bob, _) = ctx.user_with_role(&unique_username("bob"), "voluntario").await;

    let own = ctx
        .create("/notificaciones/create", json!({ "usuario_id": alice, "title": "Turno", "message": "Stand 2" }))
        .await;
    let private = ctx
        .create("/notificaciones/create", json!({ "usuario_id": bob, "title": "Privado", "message": "Solo Bob" }))
        .await;
    let broadcast = ctx
        .create("/notificaciones/create", json!({ "title": "Aviso", "message": "Para todos" }))
        .await;

    for uri in ["/notificaciones", "/notificaciones/activos"] {
        let response = ctx.request(Method::GET, uri, Some(&alice_token), None).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", uri);
    }

    let response = ctx
        .request(Method::GET, &format!("/notificaciones/{}", private), Some(&alice_token), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    for id in [own, broadcast] {
        let response = ctx
            .request(Method::GET, &format!("/notificaciones/{}", id), Some(&alice_token), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["id"], id);
    }

    let response = ctx.get("/notificaciones").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.as_array().unwrap().iter().any(|n| n["id"] == private));

    let response = ctx.get(&format!("/notificaciones/{}", private)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Solo Bob");
}
