use crate::auth::{AdminUser, AuthUser};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use gallery_core::models::{Comment, CreateCommentRequest, NewComment};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteCommentResponse {
    /// Item the comment belonged to
    pub media_item_id: i32,
}

#[utoipa::path(
    post,
    path = "/api/v0/items/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Comment shorter than 4 characters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, user, request),
    fields(user_id = %user.user_id, item_id = id, operation = "add_comment")
)]
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let comment = state
        .comments
        .add_comment(NewComment {
            media_item_id: id,
            user_id: user.user_id,
            user_name: user.user_name,
            content: request.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/comments/{id}",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = DeleteCommentResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, admin),
    fields(user_id = %admin.0.user_id, comment_id = id, operation = "delete_comment")
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_item_id = state.comments.delete_comment(id).await?;
    Ok(Json(DeleteCommentResponse { media_item_id }))
}
