use crate::auth::AdminUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use gallery_core::models::{CreateFolderRequest, MediaItem};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v0/folders",
    tag = "folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = MediaItem),
        (status = 400, description = "Invalid title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Parent folder not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, admin, request),
    fields(user_id = %admin.0.user_id, parent_id = ?request.parent_id, operation = "create_folder")
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CreateFolderRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let folder = state.items.create_folder(&request).await?;
    tracing::info!(folder_id = folder.id(), "Folder created");

    Ok((StatusCode::CREATED, Json(folder)))
}
