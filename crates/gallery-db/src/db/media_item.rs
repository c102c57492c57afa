use std::future::Future;

use async_trait::async_trait;
use gallery_core::{
    models::{
        CreateFolderRequest, ItemDetail, MediaItem, MediaItemRow, MediaKind, NewMediaFile,
        FOLDER_THUMBNAIL,
    },
    path::FolderNode,
    AppError, FolderTree, PageSource, MAX_FOLDER_DEPTH,
};
use sqlx::{PgPool, Postgres};

use super::CommentRepository;

const ITEM_COLUMNS: &str =
    "id, kind, title, thumbnail, parent_id, file_name, latitude, longitude, created_at";

fn into_items(rows: Vec<MediaItemRow>) -> Result<Vec<MediaItem>, AppError> {
    rows.into_iter().map(MediaItem::try_from).collect()
}

/// Repository for folders, photos and videos
#[derive(Clone)]
pub struct MediaItemRepository {
    pool: PgPool,
    comments: CommentRepository,
}

impl MediaItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            comments: CommentRepository::new(pool.clone()),
            pool,
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select", db.record_id = id))]
    pub async fn get_item(&self, id: i32) -> Result<Option<MediaItem>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM media_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MediaItem::try_from).transpose()
    }

    /// Direct children of a folder, folders first
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select"))]
    pub async fn children_of(&self, folder_id: i32) -> Result<Vec<MediaItem>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM media_items WHERE parent_id = $1 ORDER BY kind ASC, title ASC, id ASC"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        into_items(rows)
    }

    /// Item with its children, comments and ancestor breadcrumbs
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select", db.record_id = id))]
    pub async fn get_item_detail(&self, id: i32) -> Result<Option<ItemDetail>, AppError> {
        let Some(item) = self.get_item(id).await? else {
            return Ok(None);
        };

        let children = match item {
            MediaItem::Folder(_) => self.children_of(id).await?,
            MediaItem::Photo(_) | MediaItem::Video(_) => Vec::new(),
        };
        let comments = self.comments.list_for_item(id).await?;
        let tree = self.folder_tree_for(item.parent_id()).await?;
        let context = tree.page_context(item.id(), item.title(), item.parent_id())?;

        Ok(Some(ItemDetail {
            item,
            children,
            comments,
            context,
        }))
    }

    /// Load the ancestor chain of `folder_id` into a `FolderTree`.
    ///
    /// The walk stops one level past `MAX_FOLDER_DEPTH`, so a cyclic chain comes back
    /// truncated and is reported by the tree rather than looping in the database.
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select"))]
    pub async fn folder_tree_for(&self, folder_id: Option<i32>) -> Result<FolderTree, AppError> {
        let Some(folder_id) = folder_id else {
            return Ok(FolderTree::new());
        };

        let rows = sqlx::query_as::<Postgres, (i32, Option<i32>, String)>(
            r#"
            WITH RECURSIVE chain (id, parent_id, title, depth) AS (
                SELECT id, parent_id, title, 1
                FROM media_items
                WHERE id = $1 AND kind = 'folder'
                UNION ALL
                SELECT m.id, m.parent_id, m.title, c.depth + 1
                FROM media_items m
                INNER JOIN chain c ON m.id = c.parent_id
                WHERE c.depth <= $2
            )
            SELECT id, parent_id, title FROM chain
            "#,
        )
        .bind(folder_id)
        .bind(MAX_FOLDER_DEPTH as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, parent_id, title)| FolderNode {
                id,
                parent_id,
                title,
            })
            .collect())
    }

    /// Storage key of the file served for `item`.
    pub async fn storage_key_for(&self, item: &MediaItem) -> Result<String, AppError> {
        match item {
            MediaItem::Folder(_) => Ok(FOLDER_THUMBNAIL.to_string()),
            MediaItem::Photo(file) | MediaItem::Video(file) => {
                let tree = self.folder_tree_for(file.header.parent_id).await?;
                tree.resolve_path(file.header.parent_id, &file.file_name)
            }
        }
    }

    /// Listing of every photo, in upload order
    pub fn photo_page_source(&self) -> PhotoListing {
        PhotoListing {
            pool: self.pool.clone(),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select"))]
    pub async fn recent_photos(&self, limit: i64) -> Result<Vec<MediaItem>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM media_items WHERE kind = 'photo' ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_items(rows)
    }

    /// Photos with the most comments
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select"))]
    pub async fn popular_photos(&self, limit: i64) -> Result<Vec<MediaItem>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaItemRow>(
            r#"
            SELECT m.id, m.kind, m.title, m.thumbnail, m.parent_id, m.file_name,
                   m.latitude, m.longitude, m.created_at
            FROM media_items m
            LEFT JOIN comments c ON c.media_item_id = m.id
            WHERE m.kind = 'photo'
            GROUP BY m.id
            ORDER BY COUNT(c.id) DESC, m.created_at DESC, m.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_items(rows)
    }

    async fn ensure_folder(&self, folder_id: Option<i32>) -> Result<(), AppError> {
        let Some(folder_id) = folder_id else {
            return Ok(());
        };

        let is_folder = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM media_items WHERE id = $1 AND kind = 'folder')",
        )
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await?;

        if !is_folder {
            return Err(AppError::NotFound(format!(
                "Parent folder {} not found",
                folder_id
            )));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "media_items", db.operation = "insert"))]
    pub async fn create_folder(&self, request: &CreateFolderRequest) -> Result<MediaItem, AppError> {
        self.ensure_folder(request.parent_id).await?;

        let row = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            r#"
            INSERT INTO media_items (kind, title, thumbnail, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(MediaKind::Folder)
        .bind(&request.title)
        .bind(FOLDER_THUMBNAIL)
        .bind(request.parent_id)
        .fetch_one(&self.pool)
        .await?;

        MediaItem::try_from(row)
    }

    #[tracing::instrument(skip(self, file), fields(db.table = "media_items", db.operation = "insert", file_name = %file.file_name))]
    pub async fn insert_media_file(&self, file: &NewMediaFile) -> Result<MediaItem, AppError> {
        if !file.kind.is_file() {
            return Err(AppError::InvalidInput(
                "Uploaded files must be photos or videos".to_string(),
            ));
        }
        self.ensure_folder(file.parent_id).await?;

        let row = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            r#"
            INSERT INTO media_items (kind, title, thumbnail, parent_id, file_name, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(file.kind)
        .bind(&file.title)
        .bind(file.thumbnail())
        .bind(file.parent_id)
        .bind(&file.file_name)
        .bind(file.location.map(|l| l.latitude))
        .bind(file.location.map(|l| l.longitude))
        .fetch_one(&self.pool)
        .await?;

        MediaItem::try_from(row)
    }

    /// Rename a photo or video
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "update", db.record_id = id))]
    pub async fn update_title(&self, id: i32, title: &str) -> Result<MediaItem, AppError> {
        let row = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "UPDATE media_items SET title = $2 WHERE id = $1 AND kind <> 'folder' RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))?;

        MediaItem::try_from(row)
    }

    /// Delete a photo or video together with its stored file.
    ///
    /// `remove_file` runs after the row is deleted but before the transaction commits,
    /// so a storage failure leaves the row in place. Returns the former parent folder.
    #[tracing::instrument(skip(self, remove_file), fields(db.table = "media_items", db.operation = "delete", db.record_id = id))]
    pub async fn delete_media_file<F, Fut>(
        &self,
        id: i32,
        remove_file: F,
    ) -> Result<Option<i32>, AppError>
    where
        F: FnOnce(MediaItem) -> Fut + Send,
        Fut: Future<Output = Result<(), AppError>> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "DELETE FROM media_items WHERE id = $1 AND kind <> 'folder' RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))?;

        let item = MediaItem::try_from(row)?;
        let parent_id = item.parent_id();

        remove_file(item).await?;
        tx.commit().await?;

        Ok(parent_id)
    }
}

/// Count-and-slice view over all photos
#[derive(Clone)]
pub struct PhotoListing {
    pool: PgPool,
}

#[async_trait]
impl PageSource<MediaItem> for PhotoListing {
    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "count"))]
    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM media_items WHERE kind = 'photo'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_items", db.operation = "select"))]
    async fn fetch(&self, skip: i64, take: i64) -> Result<Vec<MediaItem>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM media_items WHERE kind = 'photo' ORDER BY id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(take)
        .fetch_all(&self.pool)
        .await?;

        into_items(rows)
    }
}
