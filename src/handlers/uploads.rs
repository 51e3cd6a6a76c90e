//! Image upload routes for products and events
//!
//! The image travels in the multipart field `imagen`; the response is the
//! entity with its new `image_path`.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::app::AppState;
use crate::database::{ImageOwner, Resource};
use crate::middleware::Authenticated;
use crate::models::{Event, Product};
use crate::services::ImageUpload;
use crate::utils::errors::{ColectaError, Result};

/// Name of the multipart field carrying the file
pub const IMAGE_FIELD: &str = "imagen";

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/:id/imagen",
        post(upload_product_image).layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
    )
}

pub fn event_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/:id/imagen",
        post(upload_event_image).layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
    )
}

/// Pull the `imagen` field out of the form
async fn read_image(mut multipart: Multipart) -> Result<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ColectaError::Upload(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ColectaError::Upload("the image field has no file name".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ColectaError::Upload(e.body_text()))?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(ColectaError::Upload(format!("multipart field '{}' is required", IMAGE_FIELD)))
}

async fn upload_product_image(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    caller.require(&Product::permission())?;
    let upload = read_image(multipart).await?;

    state
        .services
        .upload_service
        .store(ImageOwner::Product, id, upload)
        .await?;

    state
        .db
        .crud::<Product>()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ColectaError::NotFound { resource: Product::NAME, id })
}

async fn upload_event_image(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Event>> {
    caller.require(&Event::permission())?;
    let upload = read_image(multipart).await?;

    state
        .services
        .upload_service
        .store(ImageOwner::Event, id, upload)
        .await?;

    state
        .db
        .crud::<Event>()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ColectaError::NotFound { resource: Event::NAME, id })
}
