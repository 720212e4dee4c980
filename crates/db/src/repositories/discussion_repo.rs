//! Repository for `discussion_posts` and `discussion_comments`.

use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::discussion::{
    CommentWithAuthor, CreateComment, CreatePost, DiscussionComment, DiscussionPost,
    PostWithAuthor,
};

/// Column list for `discussion_posts` queries.
const POST_COLUMNS: &str = "id, community_id, author_id, title, content, created_at, updated_at";

/// Column list for `discussion_comments` queries.
const COMMENT_COLUMNS: &str = "id, post_id, author_id, content, created_at, updated_at";

/// Select list for [`PostWithAuthor`], relative to aliases `p` and `u`.
const POST_AUTHOR_COLUMNS: &str = "\
    p.id, p.community_id, p.author_id, u.username AS author_username, p.title, p.content, \
    (SELECT COUNT(*) FROM discussion_comments dc WHERE dc.post_id = p.id) AS comment_count, \
    p.created_at, p.updated_at";

/// Provides CRUD operations for community discussions.
pub struct DiscussionRepo;

impl DiscussionRepo {
    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Start a discussion in a community.
    pub async fn create_post(
        pool: &PgPool,
        community_id: DbId,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<DiscussionPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO discussion_posts (community_id, author_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, DiscussionPost>(&query)
            .bind(community_id)
            .bind(author_id)
            .bind(input.title.trim())
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a post by internal ID.
    pub async fn find_post_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DiscussionPost>, sqlx::Error> {
        let query = format!("SELECT {POST_COLUMNS} FROM discussion_posts WHERE id = $1");
        sqlx::query_as::<_, DiscussionPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post with its author name and comment count.
    pub async fn find_post_with_author(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PostWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {POST_AUTHOR_COLUMNS}
             FROM discussion_posts p JOIN users u ON u.id = p.author_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Posts of a community, newest first.
    pub async fn list_posts(
        pool: &PgPool,
        community_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {POST_AUTHOR_COLUMNS}
             FROM discussion_posts p JOIN users u ON u.id = p.author_id
             WHERE p.community_id = $1
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(community_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a post and, by cascade, its comments.
    pub async fn delete_post(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM discussion_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Comment on a post.
    pub async fn create_comment(
        pool: &PgPool,
        post_id: DbId,
        author_id: DbId,
        input: &CreateComment,
    ) -> Result<DiscussionComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO discussion_comments (post_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, DiscussionComment>(&query)
            .bind(post_id)
            .bind(author_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by internal ID.
    pub async fn find_comment_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DiscussionComment>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM discussion_comments WHERE id = $1");
        sqlx::query_as::<_, DiscussionComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comments of a post, oldest first.
    pub async fn list_comments(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                    c.content, c.created_at
             FROM discussion_comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.post_id = $1
             ORDER BY c.created_at, c.id",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a comment. Returns `true` if a row was deleted.
    pub async fn delete_comment(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM discussion_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
