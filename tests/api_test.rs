//! Integration tests for the generic resource routes, authentication,
//! accounts, roles, stands and reports

#[macro_use]
mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;
use serial_test::serial;
use Colecta::models::Person;

use helpers::*;

#[tokio::test]
#[serial]
async fn test_health_reports_database() {
    let ctx = context_or_skip!();

    let response = ctx.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], true);
    assert!(response.body["redis"].is_null());
}

#[tokio::test]
#[serial]
async fn test_requests_without_token_are_rejected() {
    let ctx = context_or_skip!();

    let response = ctx.request(Method::GET, "/personas", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthorized");

    let response = ctx.request(Method::GET, "/personas", Some("not-a-token"), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_person_lifecycle() {
    let ctx = context_or_skip!();

    let id = ctx.create("/personas/create", person_payload()).await;

    let response = ctx.get(&format!("/personas/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["estado"], 1);

    let response = ctx
        .put(&format!("/personas/update/{}", id), json!({ "address": "Calle Falsa 123" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["address"], "Calle Falsa 123");

    let response = ctx.delete(&format!("/personas/delete/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["estado"], 0);

    let all = ctx.get("/personas").await;
    let active = ctx.get("/personas/activos").await;
    assert_eq!(all.body.as_array().unwrap().len(), 1);
    assert!(active.body.as_array().unwrap().is_empty());
    assert_eq!(ctx.state.db.crud::<Person>().count_active().await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_validation_and_missing_rows() {
    let ctx = context_or_skip!();

    let mut payload = person_payload();
    payload["document"] = json!("12.3");
    let response = ctx.post("/personas/create", payload).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "validation_error");

    let response = ctx.post("/personas/create", json!({ "first_name": "Ana" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.get("/personas/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.put("/personas/update/999", json!({ "address": "x" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.delete("/personas/delete/999").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_duplicate_document_is_conflict() {
    let ctx = context_or_skip!();

    let payload = person_payload();
    ctx.create("/personas/create", payload.clone()).await;

    let response = ctx.post("/personas/create", payload).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn test_event_range_checked_after_merge() {
    let ctx = context_or_skip!();

    let event = event_payload();
    let id = ctx.create("/eventos/create", event.clone()).await;

    let starts_at: chrono::DateTime<chrono::Utc> = serde_json::from_value(event["starts_at"].clone()).unwrap();
    let response = ctx
        .put(
            &format!("/eventos/update/{}", id),
            json!({ "ends_at": starts_at - chrono::Duration::hours(1) }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.get(&format!("/eventos/{}", id)).await;
    let stored_end: chrono::DateTime<chrono::Utc> = serde_json::from_value(response.body["ends_at"].clone()).unwrap();
    assert!(stored_end > starts_at);
}

#[tokio::test]
#[serial]
async fn test_read_only_role_cannot_write() {
    let ctx = context_or_skip!();
    let (_, token) = ctx.user_with_role(&unique_username("vol"), "voluntario").await;

    let response = ctx.request(Method::GET, "/personas", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx
        .request(Method::POST, "/personas/create", Some(&token), Some(person_payload()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "forbidden");

    let response = ctx
        .request(Method::GET, "/reportes/productos/stock-bajo", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn test_login_and_me() {
    let ctx = context_or_skip!();

    let response = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "Bearer");
    assert!(response.body["expires_in"].as_i64().unwrap() > 0);
    assert!(response.body["user"].get("password_hash").is_none());

    let response = ctx.request(Method::GET, "/auth/me", Some(&ctx.admin_token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], ADMIN_USERNAME);
    let permissions = response.body["permissions"].as_array().unwrap();
    assert!(permissions.iter().any(|p| p == "reportes.ver"));
}

#[tokio::test]
#[serial]
async fn test_login_failures_share_one_message() {
    let ctx = context_or_skip!();

    let wrong_password = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": "wrong-password" })),
        )
        .await;
    let unknown_user = ctx
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "nobody.here", "password": "wrong-password" })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], unknown_user.body["message"]);
}

#[tokio::test]
#[serial]
async fn test_deactivated_user_loses_access() {
    let ctx = context_or_skip!();
    let (id, token) = ctx.user_with_role(&unique_username("temp"), "voluntario").await;

    let response = ctx.delete(&format!("/usuarios/delete/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.request(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_change_password_only_for_self() {
    let ctx = context_or_skip!();
    let username = unique_username("pwd");
    let (id, token) = ctx.user_with_role(&username, "voluntario").await;

    let body = json!({ "current_password": "volunteer-password-1", "new_password": "a-new-password-2" });

    let response = ctx
        .request(Method::PUT, &format!("/usuarios/password/{}", id), Some(&ctx.admin_token), Some(body.clone()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let wrong = json!({ "current_password": "not-my-password", "new_password": "a-new-password-2" });
    let response = ctx
        .request(Method::PUT, &format!("/usuarios/password/{}", id), Some(&token), Some(wrong))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .request(Method::PUT, &format!("/usuarios/password/{}", id), Some(&token), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    ctx.login(&username, "a-new-password-2").await;
}

#[tokio::test]
#[serial]
async fn test_role_permissions_replace_takes_effect() {
    let ctx = context_or_skip!();

    let role_name = format!("coordinador_{}", &unique_username("r")[2..8]);
    let role_id = ctx.create("/roles/create", json!({ "name": role_name })).await;
    let permission: (i64,) = sqlx::query_as("SELECT id FROM permisos WHERE name = 'personas.gestionar'")
        .fetch_one(&ctx.database.pool)
        .await
        .unwrap();

    let username = unique_username("coord");
    let response = ctx
        .post(
            "/usuarios/create",
            json!({ "username": username, "password": "coordinator-pass-1", "role_id": role_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let token = ctx.login(&username, "coordinator-pass-1").await;

    let response = ctx
        .request(Method::POST, "/personas/create", Some(&token), Some(person_payload()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx
        .put(&format!("/roles/{}/permisos", role_id), json!({ "permiso_ids": [permission.0] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let response = ctx
        .request(Method::POST, "/personas/create", Some(&token), Some(person_payload()))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = ctx.get(&format!("/roles/{}/permisos", role_id)).await;
    assert_eq!(response.body[0]["name"], "personas.gestionar");

    let response = ctx
        .put(&format!("/roles/{}/permisos", role_id), json!({ "permiso_ids": [999_999] }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.put("/roles/999999/permisos", json!({ "permiso_ids": [] })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

async fn holds_permission(ctx: &TestContext, token: &str, name: &str) -> bool {
    let response = ctx.request(Method::GET, "/auth/me", Some(token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["permissions"].as_array().unwrap().iter().any(|p| p == name)
}

#[tokio::test]
#[serial]
async fn test_role_and_permission_writes_clear_cached_permissions() {
    let Some(redis) = TestRedis::new().await else { return };
    let prefix = format!("colecta-test-{}:", uuid::Uuid::new_v4().simple());
    let Some(ctx) = TestContext::new_with_settings(|settings| {
        settings.redis.enabled = true;
        settings.redis.url = redis.url.clone();
        settings.redis.prefix = prefix;
    })
    .await
    else {
        return;
    };

    let resource: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .map(|c| (b'a' + c.to_digit(16).unwrap_or(0) as u8) as char)
        .collect();
    let name = format!("{}.ver", resource);
    let permiso_id = ctx.create("/permisos/create", json!({ "name": name })).await;
    let role_id = ctx
        .create("/roles/create", json!({ "name": format!("cache_{}", resource) }))
        .await;
    let response = ctx
        .put(&format!("/roles/{}/permisos", role_id), json!({ "permiso_ids": [permiso_id] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let username = unique_username("cache");
    ctx.create(
        "/usuarios/create",
        json!({ "username": username, "password": "cached-password-1", "role_id": role_id }),
    )
    .await;
    let token = ctx.login(&username, "cached-password-1").await;
    // first lookup fills the cache
    assert!(holds_permission(&ctx, &token, &name).await);

    let response = ctx.delete(&format!("/permisos/delete/{}", permiso_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!holds_permission(&ctx, &token, &name).await);

    let response = ctx.put(&format!("/permisos/update/{}", permiso_id), json!({ "estado": 1 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(holds_permission(&ctx, &token, &name).await);

    let response = ctx.delete(&format!("/roles/delete/{}", role_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!holds_permission(&ctx, &token, &name).await);

    let response = ctx.put(&format!("/roles/update/{}", role_id), json!({ "estado": 1 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(holds_permission(&ctx, &token, &name).await);
}

#[tokio::test]
#[serial]
async fn test_stand_volunteer_assignment() {
    let ctx = context_or_skip!();

    let evento_id = ctx.create("/eventos/create", event_payload()).await;
    let stand_id = ctx.create("/stands/create", stand_payload(evento_id)).await;
    let persona_id = ctx.create("/personas/create", person_payload()).await;
    let voluntario_id = ctx
        .create("/voluntarios/create", json!({ "persona_id": persona_id, "skills": "caja" }))
        .await;

    let response = ctx.get(&format!("/stands/evento/{}", evento_id)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let uri = format!("/stands/{}/voluntarios", stand_id);
    let response = ctx.post(&uri, json!({ "voluntario_id": voluntario_id })).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = ctx.post(&uri, json!({ "voluntario_id": voluntario_id })).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx.post(&uri, json!({ "voluntario_id": 999 })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.get(&uri).await;
    assert_eq!(response.body[0]["id"], voluntario_id);

    let response = ctx.delete(&format!("{}/{}", uri, voluntario_id)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = ctx.delete(&format!("{}/{}", uri, voluntario_id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_low_stock_report_threshold() {
    let ctx = context_or_skip!();

    let low = ctx.create("/productos/create", product_payload(500, 2)).await;
    ctx.create("/productos/create", product_payload(500, 50)).await;

    let response = ctx.get("/reportes/productos/stock-bajo").await;
    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<i64> = response.body.as_array().unwrap().iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![low]);

    let response = ctx.get("/reportes/productos/stock-bajo?umbral=100").await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = ctx.get("/reportes/eventos/999/ventas").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
