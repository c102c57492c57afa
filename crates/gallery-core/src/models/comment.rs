use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Comment left on an item. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Comment {
    pub id: i32,
    pub media_item_id: i32,
    /// Subject claim from the identity provider
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for posting a comment
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 4, message = "Comment must be at least 4 characters"))]
    pub content: String,
}

/// Insert payload for a comment, author taken from the caller's token.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub media_item_id: i32,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}
