use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Comment, GeoLocation, MediaFile, MediaFolder, FOLDER_THUMBNAIL};
use crate::error::AppError;
use crate::path::PageContext;

/// Item kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Folder,
    Photo,
    Video,
}

impl MediaKind {
    pub fn is_file(self) -> bool {
        !matches!(self, MediaKind::Folder)
    }
}

/// Fields shared by every item variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemHeader {
    pub id: i32,
    pub title: String,
    pub thumbnail: String,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Flat `media_items` row as stored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaItemRow {
    pub id: i32,
    pub kind: MediaKind,
    pub title: String,
    pub thumbnail: String,
    pub parent_id: Option<i32>,
    pub file_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A browsable gallery entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaItem {
    Folder(MediaFolder),
    Photo(MediaFile),
    Video(MediaFile),
}

impl MediaItem {
    pub fn header(&self) -> &ItemHeader {
        match self {
            MediaItem::Folder(folder) => &folder.header,
            MediaItem::Photo(file) | MediaItem::Video(file) => &file.header,
        }
    }

    pub fn id(&self) -> i32 {
        self.header().id
    }

    pub fn title(&self) -> &str {
        &self.header().title
    }

    pub fn thumbnail(&self) -> &str {
        &self.header().thumbnail
    }

    pub fn parent_id(&self) -> Option<i32> {
        self.header().parent_id
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Folder(_) => MediaKind::Folder,
            MediaItem::Photo(_) => MediaKind::Photo,
            MediaItem::Video(_) => MediaKind::Video,
        }
    }

    /// The stored file for photos and videos.
    pub fn as_file(&self) -> Option<&MediaFile> {
        match self {
            MediaItem::Folder(_) => None,
            MediaItem::Photo(file) | MediaItem::Video(file) => Some(file),
        }
    }

    /// Name of the file served for this item; folders are served their fixed thumbnail.
    pub fn served_file_name(&self) -> &str {
        self.as_file()
            .map_or(FOLDER_THUMBNAIL, |file| file.file_name.as_str())
    }
}

impl TryFrom<MediaItemRow> for MediaItem {
    type Error = AppError;

    fn try_from(row: MediaItemRow) -> Result<Self, Self::Error> {
        let header = ItemHeader {
            id: row.id,
            title: row.title,
            thumbnail: row.thumbnail,
            parent_id: row.parent_id,
            created_at: row.created_at,
        };

        if row.kind == MediaKind::Folder {
            return Ok(MediaItem::Folder(MediaFolder { header }));
        }

        let file_name = row.file_name.ok_or_else(|| {
            AppError::Internal(format!("Media item {} has no stored file name", row.id))
        })?;
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoLocation {
                latitude,
                longitude,
            }),
            _ => None,
        };
        let file = MediaFile {
            header,
            file_name,
            location,
        };

        Ok(match row.kind {
            MediaKind::Video => MediaItem::Video(file),
            _ => MediaItem::Photo(file),
        })
    }
}

/// Everything shown on an item's page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDetail {
    pub item: MediaItem,
    /// Direct children, for folders
    pub children: Vec<MediaItem>,
    pub comments: Vec<Comment>,
    pub context: PageContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: MediaKind, file_name: Option<&str>) -> MediaItemRow {
        MediaItemRow {
            id: 7,
            kind,
            title: "Sunset".to_string(),
            thumbnail: "sunset.jpg".to_string(),
            parent_id: Some(2),
            file_name: file_name.map(str::to_string),
            latitude: Some(64.1),
            longitude: Some(-21.9),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_photo_row_converts() {
        let item = MediaItem::try_from(row(MediaKind::Photo, Some("sunset.jpg"))).unwrap();
        assert_eq!(item.kind(), MediaKind::Photo);
        assert_eq!(item.id(), 7);
        assert_eq!(item.parent_id(), Some(2));
        assert_eq!(item.served_file_name(), "sunset.jpg");
        let location = item.as_file().and_then(|f| f.location).unwrap();
        assert_eq!(location.longitude, -21.9);
    }

    #[test]
    fn test_folder_row_ignores_file_columns() {
        let item = MediaItem::try_from(row(MediaKind::Folder, None)).unwrap();
        assert_eq!(item.kind(), MediaKind::Folder);
        assert!(item.as_file().is_none());
        assert_eq!(item.served_file_name(), FOLDER_THUMBNAIL);
    }

    #[test]
    fn test_file_row_without_file_name_is_rejected() {
        assert!(MediaItem::try_from(row(MediaKind::Video, None)).is_err());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let item = MediaItem::try_from(row(MediaKind::Video, Some("clip.mp4"))).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "video");
        assert_eq!(json["file_name"], "clip.mp4");
        assert_eq!(json["header"]["title"], "Sunset");
    }
}
