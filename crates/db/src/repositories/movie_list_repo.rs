//! Repositories for the per-user movie lists: `watchlist_items` and
//! `favorites`.
//!
//! Both tables have the same shape, so the queries are shared and each
//! public repo only fixes the table name.

use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::watchlist::{ListChange, ListEntry, ListedMovie};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, movie_id, added_at";

/// Provides idempotent add/remove for the watchlist.
pub struct WatchlistRepo;

/// Provides idempotent add/remove for favorites.
pub struct FavoriteRepo;

impl WatchlistRepo {
    const TABLE: &'static str = "watchlist_items";

    /// Add a movie to the user's watchlist. Adding twice is a no-op.
    pub async fn add(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<ListChange, sqlx::Error> {
        add(pool, Self::TABLE, user_id, movie_id).await
    }

    /// Remove a movie. Returns `true` if it was on the watchlist.
    pub async fn remove(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
        remove(pool, Self::TABLE, user_id, movie_id).await
    }

    /// Whether the movie is on the user's watchlist.
    pub async fn contains(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
        contains(pool, Self::TABLE, user_id, movie_id).await
    }

    /// The user's watchlist, most recently added first.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ListedMovie>, sqlx::Error> {
        list(pool, Self::TABLE, user_id, limit, offset).await
    }
}

impl FavoriteRepo {
    const TABLE: &'static str = "favorites";

    /// Mark a movie as a favorite. Adding twice is a no-op.
    pub async fn add(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<ListChange, sqlx::Error> {
        add(pool, Self::TABLE, user_id, movie_id).await
    }

    /// Unmark a favorite. Returns `true` if it was marked.
    pub async fn remove(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
        remove(pool, Self::TABLE, user_id, movie_id).await
    }

    /// Whether the user marked the movie as a favorite.
    pub async fn contains(pool: &PgPool, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
        contains(pool, Self::TABLE, user_id, movie_id).await
    }

    /// The user's favorites, most recently added first.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ListedMovie>, sqlx::Error> {
        list(pool, Self::TABLE, user_id, limit, offset).await
    }
}

async fn add(
    pool: &PgPool,
    table: &str,
    user_id: DbId,
    movie_id: DbId,
) -> Result<ListChange, sqlx::Error> {
    let insert = format!(
        "INSERT INTO {table} (user_id, movie_id) VALUES ($1, $2)
         ON CONFLICT (user_id, movie_id) DO NOTHING
         RETURNING {COLUMNS}"
    );
    if let Some(entry) = sqlx::query_as::<_, ListEntry>(&insert)
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(pool)
        .await?
    {
        return Ok(ListChange {
            entry,
            created: true,
        });
    }

    let select = format!("SELECT {COLUMNS} FROM {table} WHERE user_id = $1 AND movie_id = $2");
    let entry = sqlx::query_as::<_, ListEntry>(&select)
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(pool)
        .await?;
    Ok(ListChange {
        entry,
        created: false,
    })
}

async fn remove(pool: &PgPool, table: &str, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {table} WHERE user_id = $1 AND movie_id = $2");
    let result = sqlx::query(&query)
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn contains(pool: &PgPool, table: &str, user_id: DbId, movie_id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE user_id = $1 AND movie_id = $2)");
    sqlx::query_scalar::<_, bool>(&query)
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(pool)
        .await
}

async fn list(
    pool: &PgPool,
    table: &str,
    user_id: DbId,
    limit: i64,
    offset: i64,
) -> Result<Vec<ListedMovie>, sqlx::Error> {
    let query = format!(
        "SELECT m.id AS movie_id, m.title, m.release_date, m.poster_url, m.content_type,
                rs.weighted_average, l.added_at
         FROM {table} l
         JOIN movies m ON m.id = l.movie_id
         LEFT JOIN rating_stats rs ON rs.movie_id = m.id
         WHERE l.user_id = $1
         ORDER BY l.added_at DESC, l.id DESC
         LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, ListedMovie>(&query)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
