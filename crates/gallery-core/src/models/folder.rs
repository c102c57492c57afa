use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::ItemHeader;

/// Thumbnail file served for every folder, kept at the storage root.
pub const FOLDER_THUMBNAIL: &str = "folder.jpg";

/// Folder item; children are loaded separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaFolder {
    pub header: ItemHeader,
}

/// Request DTO for creating a new folder
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateFolderRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Folder title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_folder_request_validation() {
        let ok: CreateFolderRequest =
            serde_json::from_str(r#"{"title":"Holidays"}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.parent_id.is_none());

        let empty = CreateFolderRequest {
            title: String::new(),
            parent_id: Some(1),
        };
        assert!(empty.validate().is_err());
    }
}
