//! Integration tests for product and event image uploads

#[macro_use]
mod helpers;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serial_test::serial;

use helpers::*;

const BOUNDARY: &str = "colecta-test-boundary";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            field, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
#[serial]
async fn test_product_image_is_stored_and_served() {
    let ctx = context_or_skip!();
    let product = ctx.create("/productos/create", product_payload(300, 1)).await;

    let body = multipart_body("imagen", "foto.png", "image/png", PNG_BYTES);
    let response = ctx
        .send(upload_request(&format!("/productos/{}/imagen", product), &ctx.admin_token, body))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let image_path = response.body["image_path"].as_str().unwrap().to_string();
    assert!(image_path.starts_with("/uploads/productos/"));
    assert!(image_path.ends_with(".png"));

    let file_name = image_path.rsplit('/').next().unwrap();
    let on_disk = ctx.temp_dir.path().join("uploads").join("productos").join(file_name);
    assert_eq!(std::fs::read(&on_disk).unwrap(), PNG_BYTES);

    let served = ctx.request(Method::GET, &image_path, None, None).await;
    assert_eq!(served.status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_replacing_an_image_removes_the_old_file() {
    let ctx = context_or_skip!();
    let evento_id = ctx.create("/eventos/create", event_payload()).await;
    let uri = format!("/eventos/{}/imagen", evento_id);

    let first = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("imagen", "a.png", "image/png", PNG_BYTES)))
        .await;
    let first_path = first.body["image_path"].as_str().unwrap().to_string();

    let second = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("imagen", "b.png", "image/png", PNG_BYTES)))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_ne!(second.body["image_path"], first_path.as_str());

    let old_name = first_path.rsplit('/').next().unwrap();
    assert!(!ctx.temp_dir.path().join("uploads").join("eventos").join(old_name).exists());
}

#[tokio::test]
#[serial]
async fn test_rejected_uploads() {
    let ctx = context_or_skip!();
    let product = ctx.create("/productos/create", product_payload(300, 1)).await;
    let uri = format!("/productos/{}/imagen", product);

    let response = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("imagen", "script.sh", "text/x-sh", b"echo hi")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "upload_error");

    let response = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("imagen", "foto.png", "image/jpeg", PNG_BYTES)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("archivo", "foto.png", "image/png", PNG_BYTES)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let too_big = vec![0u8; ctx.settings.server.max_upload_bytes + 1];
    let response = ctx
        .send(upload_request(&uri, &ctx.admin_token, multipart_body("imagen", "big.png", "image/png", &too_big)))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .send(upload_request("/productos/999/imagen", &ctx.admin_token, multipart_body("imagen", "foto.png", "image/png", PNG_BYTES)))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let (_, token) = ctx.user_with_role(&unique_username("vol"), "voluntario").await;
    let response = ctx
        .send(upload_request(&uri, &token, multipart_body("imagen", "foto.png", "image/png", PNG_BYTES)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
