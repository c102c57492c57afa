use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use gallery_core::{
    models::{ItemDetail, MediaItem},
    AppError,
};
use gallery_processing::{content_type_for, render_with_effect_blocking};
use std::sync::Arc;

async fn load_item(state: &AppState, id: i32) -> Result<MediaItem, AppError> {
    state
        .items
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
}

#[utoipa::path(
    get,
    path = "/api/v0/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item with children, comments and breadcrumbs", body = ItemDetail),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(item_id = id, operation = "get_item"))]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpAppError> {
    let detail = state
        .items
        .get_item_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;

    Ok(Json(detail))
}

/// Streams the stored file of an item. Folders serve the shared folder thumbnail.
#[utoipa::path(
    get,
    path = "/api/v0/items/{id}/file",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Stored file", content_type = "application/octet-stream"),
        (status = 404, description = "Item or file not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(item_id = id, operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, HttpAppError> {
    let item = load_item(&state, id).await?;
    let storage_key = state.items.storage_key_for(&item).await?;

    tracing::debug!(storage_key = %storage_key, "Proxying file from storage");

    // Errors before the first chunk surface as a normal error response
    let stream = state.storage.download_stream(&storage_key).await?;
    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let file_name = item.served_file_name();
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(file_name))
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment;filename={}", file_name),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Serves a photo passed through a named effect.
///
/// Unknown effect names serve the photo unchanged.
#[utoipa::path(
    get,
    path = "/api/v0/items/{id}/effects/{effect}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Photo ID"),
        ("effect" = String, Path, description = "BlackWhite, OilPaint, Sepia, Blur, Sharpen, Glow or Invert")
    ),
    responses(
        (status = 200, description = "Rendered image", content_type = "image/*"),
        (status = 400, description = "Item is not a photo or cannot be decoded", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(item_id = id, operation = "render_effect"))]
pub async fn render_effect(
    State(state): State<Arc<AppState>>,
    Path((id, effect)): Path<(i32, String)>,
) -> Result<Response, HttpAppError> {
    let item = load_item(&state, id).await?;
    let MediaItem::Photo(ref photo) = item else {
        return Err(AppError::BadRequest(format!(
            "Effects can only be applied to photos, item {} is a {:?}",
            id,
            item.kind()
        ))
        .into());
    };

    let storage_key = state.items.storage_key_for(&item).await?;
    let data = state.storage.download(&storage_key).await?;
    let rendered = render_with_effect_blocking(data, effect).await?;

    Ok((
        [
            (header::CONTENT_TYPE, rendered.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment;filename={}", photo.file_name),
            ),
        ],
        rendered.data,
    )
        .into_response())
}
