use crate::auth::AdminUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use gallery_core::models::{DeleteItemResponse, MediaItem, UpdatePhotoRequest};
use gallery_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    put,
    path = "/api/v0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i32, Path, description = "Photo or video ID")
    ),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Title updated", body = MediaItem),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, admin, request),
    fields(user_id = %admin.0.user_id, item_id = id, operation = "update_photo")
)]
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdatePhotoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let item = state.items.update_title(id, &request.title).await?;
    Ok(Json(item))
}

/// Deletes the item and its stored file, then points the client at the former parent folder.
#[utoipa::path(
    delete,
    path = "/api/v0/photos/{id}",
    tag = "photos",
    params(
        ("id" = i32, Path, description = "Photo or video ID")
    ),
    responses(
        (status = 200, description = "Photo deleted", body = DeleteItemResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Stored file could not be removed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, admin),
    fields(user_id = %admin.0.user_id, item_id = id, operation = "delete_photo")
)]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpAppError> {
    let items = state.items.clone();
    let storage = state.storage.clone();

    let redirect_to = state
        .items
        .delete_media_file(id, move |item| async move {
            let storage_key = items.storage_key_for(&item).await?;
            storage.delete(&storage_key).await?;
            tracing::debug!(storage_key = %storage_key, "Stored file removed");
            Ok::<(), AppError>(())
        })
        .await?;

    tracing::info!(redirect_to = ?redirect_to, "Photo deleted");
    Ok(Json(DeleteItemResponse { redirect_to }))
}
