//! Logging middleware
//!
//! One structured line per request with method, path, status and latency.
//! Server errors log at error level, client errors at warn, and requests
//! slower than [`SLOW_REQUEST_MS`] get an extra warning.

use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

pub const SLOW_REQUEST_MS: u128 = 1000;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started.elapsed().as_millis();
    log_response(method.as_str(), &path, status, duration_ms);

    response
}

fn log_response(method: &str, path: &str, status: StatusCode, duration_ms: u128) {
    if status.is_server_error() {
        error!(method = method, path = path, status = status.as_u16(), duration_ms = duration_ms, "Request failed");
    } else if status.is_client_error() {
        warn!(method = method, path = path, status = status.as_u16(), duration_ms = duration_ms, "Request rejected");
    } else {
        info!(method = method, path = path, status = status.as_u16(), duration_ms = duration_ms, "Request completed");
    }

    if duration_ms > SLOW_REQUEST_MS {
        warn!(method = method, path = path, duration_ms = duration_ms, "Slow request detected");
    }
}
