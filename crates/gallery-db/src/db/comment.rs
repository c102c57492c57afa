use gallery_core::{
    models::{Comment, NewComment},
    AppError,
};
use sqlx::{PgPool, Postgres};

const COMMENT_COLUMNS: &str = "id, media_item_id, user_id, user_name, content, created_at";

/// Repository for item comments
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, comment), fields(db.table = "comments", db.operation = "insert", db.media_item_id = comment.media_item_id))]
    pub async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let item_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM media_items WHERE id = $1)",
        )
        .bind(comment.media_item_id)
        .fetch_one(&self.pool)
        .await?;

        if !item_exists {
            return Err(AppError::NotFound(format!(
                "Item {} not found",
                comment.media_item_id
            )));
        }

        let created = sqlx::query_as::<Postgres, Comment>(&format!(
            r#"
            INSERT INTO comments (media_item_id, user_id, user_name, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(comment.media_item_id)
        .bind(&comment.user_id)
        .bind(&comment.user_name)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Delete a comment, returning the id of the item it belonged to.
    #[tracing::instrument(skip(self), fields(db.table = "comments", db.operation = "delete", db.record_id = id))]
    pub async fn delete_comment(&self, id: i32) -> Result<i32, AppError> {
        let media_item_id = sqlx::query_scalar::<Postgres, i32>(
            "DELETE FROM comments WHERE id = $1 RETURNING media_item_id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        media_item_id.ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
    }

    /// Comments on an item, oldest first
    #[tracing::instrument(skip(self), fields(db.table = "comments", db.operation = "select"))]
    pub async fn list_for_item(&self, media_item_id: i32) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<Postgres, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE media_item_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(media_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
