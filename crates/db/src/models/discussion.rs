//! Discussion post and comment models.

use cinebuff_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `discussion_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscussionPost {
    pub id: DbId,
    pub community_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A post with its author's name and comment count, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithAuthor {
    pub id: DbId,
    pub community_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub comment_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `discussion_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscussionComment {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment with its author's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// Request body for starting a discussion.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

/// Request body for commenting on a discussion.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}
