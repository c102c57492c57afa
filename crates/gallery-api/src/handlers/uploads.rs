use crate::auth::AdminUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use gallery_core::{
    models::{MediaItem, MediaKind, NewMediaFile},
    AppError,
};
use gallery_processing::{extract_gps, sanitize_file_name};
use gallery_storage::StorageError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Form field naming the folder uploads go into; absent or empty means the root.
const PARENT_FOLDER_FIELD: &str = "parent_folder";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub items: Vec<MediaItem>,
    /// One line per rejected file
    pub messages: Vec<String>,
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_form(
    mut multipart: Multipart,
) -> Result<(Option<i32>, Vec<UploadedFile>), AppError> {
    let mut parent_id = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(PARENT_FOLDER_FIELD) {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid parent folder: {}", e)))?;
            let value = value.trim();
            if !value.is_empty() {
                parent_id = Some(value.parse::<i32>().map_err(|_| {
                    AppError::InvalidInput(format!("Invalid parent folder id: {}", value))
                })?);
            }
            continue;
        }

        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", file_name, e)))?;

        files.push(UploadedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Ok((parent_id, files))
}

/// Validate one file and describe the row it becomes.
fn prepare(
    state: &AppState,
    parent_id: Option<i32>,
    file: &UploadedFile,
) -> Result<NewMediaFile, AppError> {
    let file_name = sanitize_file_name(&file.file_name)?;
    let kind = state
        .uploads
        .validate(&file_name, &file.content_type, file.data.len())?;
    let location = match kind {
        MediaKind::Photo => extract_gps(&file.data),
        MediaKind::Video | MediaKind::Folder => None,
    };

    Ok(NewMediaFile {
        kind,
        title: file_name.clone(),
        file_name,
        parent_id,
        location,
    })
}

/// Upload photos and videos into a folder.
///
/// Files failing validation or carrying an unusable storage key are skipped and reported
/// in `messages`; the rest are stored under the folder's path and recorded.
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Upload processed", body = UploadResponse),
        (status = 400, description = "Malformed form", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Parent folder not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, admin, multipart),
    fields(user_id = %admin.0.user_id, operation = "upload")
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (parent_id, files) = read_form(multipart).await?;

    if let Some(folder_id) = parent_id {
        match state.items.get_item(folder_id).await? {
            Some(MediaItem::Folder(_)) => {}
            _ => {
                return Err(
                    AppError::NotFound(format!("Parent folder {} not found", folder_id)).into(),
                )
            }
        }
    }
    let tree = state.items.folder_tree_for(parent_id).await?;

    let mut items = Vec::with_capacity(files.len());
    let mut messages = Vec::new();

    for file in files {
        let new_file = match prepare(&state, parent_id, &file) {
            Ok(new_file) => new_file,
            Err(e) => {
                tracing::debug!(file_name = %file.file_name, error = %e, "Upload rejected");
                messages.push(format!("{}: {}", file.file_name, e));
                continue;
            }
        };

        let storage_key = tree.resolve_path(parent_id, &new_file.file_name)?;
        match state
            .storage
            .put(&storage_key, &file.content_type, file.data)
            .await
        {
            Ok(()) => {}
            Err(StorageError::InvalidKey(reason)) => {
                tracing::debug!(storage_key = %storage_key, reason = %reason, "Upload rejected");
                messages.push(format!("{}: {}", file.file_name, reason));
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        match state.items.insert_media_file(&new_file).await {
            Ok(item) => {
                tracing::info!(item_id = item.id(), storage_key = %storage_key, "File uploaded");
                items.push(item);
            }
            Err(e) => {
                let storage = state.storage.clone();
                tokio::spawn(async move {
                    if let Err(cleanup_err) = storage.delete(&storage_key).await {
                        tracing::warn!(
                            error = %cleanup_err,
                            storage_key = %storage_key,
                            "Failed to cleanup storage file after DB error"
                        );
                    }
                });
                return Err(e.into());
            }
        }
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { items, messages })))
}
