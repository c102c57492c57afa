use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use gallery_core::{get_paged, models::MediaItem, PageContext, PagedResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GalleryQuery {
    /// 1-based page of the photo listing; values below 1 show the first page
    pub page: Option<i64>,
}

/// Front page of the gallery
#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryResponse {
    pub all_photos: PagedResult<MediaItem>,
    pub new_photos: Vec<MediaItem>,
    pub popular_photos: Vec<MediaItem>,
    pub context: PageContext,
}

#[utoipa::path(
    get,
    path = "/api/v0/gallery",
    tag = "gallery",
    params(GalleryQuery),
    responses(
        (status = 200, description = "Gallery front page", body = GalleryResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "gallery_front_page"))]
pub async fn front_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GalleryQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page.unwrap_or(1).max(1);
    let featured = state.config.featured_photo_count();

    let all_photos = get_paged(
        &state.items.photo_page_source(),
        page,
        state.config.front_page_size(),
    )
    .await?;
    let new_photos = state.items.recent_photos(featured).await?;
    let popular_photos = state.items.popular_photos(featured).await?;

    Ok(Json(GalleryResponse {
        all_photos,
        new_photos,
        popular_photos,
        context: PageContext::front_page(),
    }))
}
