//! Application state and router assembly

use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService, ImageOwner};
use crate::handlers;
use crate::middleware::rate_limit::CLEANUP_INTERVAL;
use crate::middleware::{log_requests, rate_limit, RateLimitMiddleware};
use crate::services::uploads::PUBLIC_PREFIX;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(settings: Settings, pool: DatabasePool) -> Result<Self> {
        let db = DatabaseService::new(pool);
        let services = ServiceFactory::new(&settings, &db)?;

        Ok(Self {
            settings: Arc::new(settings),
            db,
            services,
        })
    }
}

/// CORS from the configured origins; a `*` entry allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn static_dir(root: &Path, owner: ImageOwner) -> (String, ServeDir) {
    (
        format!("{}/{}", PUBLIC_PREFIX, owner.dir()),
        ServeDir::new(root.join(owner.dir())),
    )
}

/// Full router with static files and every layer
pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();
    let upload_root = Path::new(&settings.server.upload_dir);

    let (products_path, products_dir) = static_dir(upload_root, ImageOwner::Product);
    let (events_path, events_dir) = static_dir(upload_root, ImageOwner::Event);

    let limiter = RateLimitMiddleware::new(&settings.rate_limit);
    limiter.start_cleanup(CLEANUP_INTERVAL);

    handlers::api_router(settings.server.max_upload_bytes)
        .nest_service(&products_path, products_dir)
        .nest_service(&events_path, events_dir)
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors_layer(&settings.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
