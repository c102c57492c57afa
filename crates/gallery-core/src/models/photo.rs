use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{ItemHeader, MediaKind};

/// Decimal-degree coordinates, south and west negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Photo or video with a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaFile {
    pub header: ItemHeader,
    pub file_name: String,
    pub location: Option<GeoLocation>,
}

/// Insert payload for an uploaded file.
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    pub kind: MediaKind,
    pub title: String,
    pub file_name: String,
    pub parent_id: Option<i32>,
    pub location: Option<GeoLocation>,
}

impl NewMediaFile {
    /// Uploaded files use their own file as thumbnail.
    pub fn thumbnail(&self) -> &str {
        &self.file_name
    }
}

/// Request DTO for editing a photo
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePhotoRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
}

/// Where the client should go after a delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteItemResponse {
    /// Former parent folder, `None` for the gallery front page
    pub redirect_to: Option<i32>,
}
