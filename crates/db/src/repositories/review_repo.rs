//! Repository for the `reviews` table.

use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{Review, ReviewWithAuthor, UpsertReview};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, movie_id, title, content, created_at, updated_at";

/// Select list for [`ReviewWithAuthor`].
const AUTHOR_COLUMNS: &str = "\
    rv.id, rv.user_id, u.username, ro.name AS role, rv.movie_id, m.title AS movie_title, \
    rv.title, rv.content, rv.created_at, rv.updated_at";

/// Joins backing [`AUTHOR_COLUMNS`].
const AUTHOR_JOINS: &str = "\
    FROM reviews rv \
    JOIN users u ON u.id = rv.user_id \
    JOIN roles ro ON ro.id = u.role_id \
    JOIN movies m ON m.id = rv.movie_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Write the user's review of a movie, replacing any earlier one.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
        input: &UpsertReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (user_id, movie_id, title, content)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, movie_id) DO UPDATE SET
                title = EXCLUDED.title,
                content = EXCLUDED.content
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(movie_id)
            .bind(input.title.trim())
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a review by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a review with its author and movie title.
    pub async fn find_with_author(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        let query = format!("SELECT {AUTHOR_COLUMNS} {AUTHOR_JOINS} WHERE rv.id = $1");
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's review of a movie.
    pub async fn find_for_user_and_movie(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE user_id = $1 AND movie_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// List reviews, newest first, optionally filtered by movie and/or author.
    pub async fn list(
        pool: &PgPool,
        movie_id: Option<DbId>,
        user_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {AUTHOR_COLUMNS} {AUTHOR_JOINS}
             WHERE ($1::bigint IS NULL OR rv.movie_id = $1)
               AND ($2::bigint IS NULL OR rv.user_id = $2)
             ORDER BY rv.created_at DESC, rv.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(movie_id)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a review. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
