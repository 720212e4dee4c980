//! Repository for the `ratings` table.
//!
//! Every write follows the same unit of work:
//!
//! 1. begin a transaction
//! 2. share-lock the author's `users` row (`SELECT ... FOR SHARE`)
//! 3. lock the movie row (`SELECT ... FOR UPDATE`)
//! 4. mutate the rating
//! 5. [`RatingStatsRepo::recompute`] on the same transaction
//! 6. commit
//!
//! The movie lock serializes concurrent writers of the same movie, so the
//! last recompute to commit always sees every committed rating. The author
//! lock makes a concurrent role change (`UserRepo::set_role`) wait for the
//! write, or the write wait for the role change, so the cached split always
//! uses the author's committed role. Locks are always taken user first, then
//! movie. Any error drops the transaction and rolls back both the rating
//! and the stats.

use cinebuff_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::rating::{
    CreateRating, RateMovie, Rating, RatingChange, RatingFilter, RatingWithAuthor,
    RatingWithMovie, UpdateRating,
};
use crate::repositories::RatingStatsRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, movie_id, story_score, acting_score, cinematography_score, \
                        overall_score, score, created_at, updated_at";

/// Provides transactional writes and reads for ratings.
pub struct RatingRepo;

impl RatingRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a new rating and refresh the movie's stats.
    ///
    /// Returns `None` if the movie does not exist. A second rating by the
    /// same user for the same movie fails with the `uq_ratings_user_movie`
    /// unique violation.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateRating,
    ) -> Result<Option<RatingChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_author(&mut *tx, user_id).await?;
        if !lock_movie(&mut *tx, input.movie_id).await? {
            return Ok(None);
        }

        let rating = insert(&mut *tx, user_id, input.movie_id, &input.scores).await?;
        let stats = RatingStatsRepo::recompute(&mut *tx, input.movie_id).await?;
        tx.commit().await?;

        Ok(Some(RatingChange { rating, stats }))
    }

    /// Create or replace the caller's rating of a movie.
    ///
    /// Returns `None` if the movie does not exist, otherwise the change and
    /// whether a new rating was created.
    pub async fn upsert_for_user(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
        input: &RateMovie,
    ) -> Result<Option<(RatingChange, bool)>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_author(&mut *tx, user_id).await?;
        if !lock_movie(&mut *tx, movie_id).await? {
            return Ok(None);
        }

        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM ratings WHERE user_id = $1 AND movie_id = $2")
                .bind(user_id)
                .bind(movie_id)
                .fetch_optional(&mut *tx)
                .await?;

        let created = existing.is_none();
        let rating = match existing {
            Some(id) => {
                let query = format!(
                    "UPDATE ratings SET
                        story_score = $2,
                        acting_score = $3,
                        cinematography_score = $4,
                        overall_score = $5,
                        score = $6
                     WHERE id = $1
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Rating>(&query)
                    .bind(id)
                    .bind(input.story_score)
                    .bind(input.acting_score)
                    .bind(input.cinematography_score)
                    .bind(input.overall_score)
                    .bind(input.score)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => insert(&mut *tx, user_id, movie_id, input).await?,
        };

        let stats = RatingStatsRepo::recompute(&mut *tx, movie_id).await?;
        tx.commit().await?;

        Ok(Some((RatingChange { rating, stats }, created)))
    }

    /// Update a rating. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no rating with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRating,
    ) -> Result<Option<RatingChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some((user_id, movie_id)) = owner_and_movie(&mut *tx, id).await? else {
            return Ok(None);
        };
        lock_author(&mut *tx, user_id).await?;
        lock_movie(&mut *tx, movie_id).await?;

        let query = format!(
            "UPDATE ratings SET
                story_score = COALESCE($2, story_score),
                acting_score = COALESCE($3, acting_score),
                cinematography_score = COALESCE($4, cinematography_score),
                overall_score = COALESCE($5, overall_score),
                score = COALESCE($6, score)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(rating) = sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .bind(input.story_score)
            .bind(input.acting_score)
            .bind(input.cinematography_score)
            .bind(input.overall_score)
            .bind(input.score)
            .fetch_optional(&mut *tx)
            .await?
        else {
            // Deleted between the lookup and the locks.
            return Ok(None);
        };

        let stats = RatingStatsRepo::recompute(&mut *tx, movie_id).await?;
        tx.commit().await?;

        Ok(Some(RatingChange { rating, stats }))
    }

    /// Delete a rating and refresh the movie's stats.
    ///
    /// Returns the deleted row, or `None` if it did not exist. The stats are
    /// `None` when the deleted rating was the movie's last one.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<RatingChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some((user_id, movie_id)) = owner_and_movie(&mut *tx, id).await? else {
            return Ok(None);
        };
        lock_author(&mut *tx, user_id).await?;
        lock_movie(&mut *tx, movie_id).await?;

        let query = format!("DELETE FROM ratings WHERE id = $1 RETURNING {COLUMNS}");
        let Some(rating) = sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let stats = RatingStatsRepo::recompute(&mut *tx, movie_id).await?;
        tx.commit().await?;

        Ok(Some(RatingChange { rating, stats }))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a rating by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's rating of a movie.
    pub async fn find_for_user_and_movie(
        pool: &PgPool,
        user_id: DbId,
        movie_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE user_id = $1 AND movie_id = $2");
        sqlx::query_as::<_, Rating>(&query)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// List a movie's ratings with their authors, most recently updated first.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RatingWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, RatingWithAuthor>(
            "SELECT r.id, r.user_id, r.movie_id, u.username, ro.name AS role,
                    r.story_score, r.acting_score, r.cinematography_score,
                    r.overall_score, r.score, r.created_at, r.updated_at
             FROM ratings r
             JOIN users u ON u.id = r.user_id
             JOIN roles ro ON ro.id = u.role_id
             WHERE r.movie_id = $1
             ORDER BY r.updated_at DESC, r.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(movie_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// List a user's ratings with movie titles, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RatingWithMovie>, sqlx::Error> {
        sqlx::query_as::<_, RatingWithMovie>(
            "SELECT r.id, r.movie_id, m.title AS movie_title,
                    r.story_score, r.acting_score, r.cinematography_score,
                    r.overall_score, r.score, r.created_at, r.updated_at
             FROM ratings r
             JOIN movies m ON m.id = r.movie_id
             WHERE r.user_id = $1
             ORDER BY r.updated_at DESC, r.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// List ratings, optionally filtered by movie and/or author.
    pub async fn list(pool: &PgPool, filter: &RatingFilter) -> Result<Vec<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ratings
             WHERE ($1::bigint IS NULL OR movie_id = $1)
               AND ($2::bigint IS NULL OR user_id = $2)
             ORDER BY updated_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(filter.movie_id)
            .bind(filter.user_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }
}

/// Lock a movie row for the rest of the transaction.
///
/// Returns `false` if the movie does not exist.
async fn lock_movie(conn: &mut PgConnection, movie_id: DbId) -> Result<bool, sqlx::Error> {
    let locked: Option<DbId> = sqlx::query_scalar("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
        .bind(movie_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(locked.is_some())
}

/// Share-lock the author's row so a role change cannot commit between this
/// write's recompute and its commit.
///
/// A missing user is left to the `ratings.user_id` foreign key to reject.
async fn lock_author(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR SHARE")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// `(user_id, movie_id)` of a rating.
async fn owner_and_movie(
    conn: &mut PgConnection,
    rating_id: DbId,
) -> Result<Option<(DbId, DbId)>, sqlx::Error> {
    sqlx::query_as("SELECT user_id, movie_id FROM ratings WHERE id = $1")
        .bind(rating_id)
        .fetch_optional(&mut *conn)
        .await
}

async fn insert(
    conn: &mut PgConnection,
    user_id: DbId,
    movie_id: DbId,
    input: &RateMovie,
) -> Result<Rating, sqlx::Error> {
    let query = format!(
        "INSERT INTO ratings
            (user_id, movie_id, story_score, acting_score, cinematography_score, overall_score, score)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Rating>(&query)
        .bind(user_id)
        .bind(movie_id)
        .bind(input.story_score)
        .bind(input.acting_score)
        .bind(input.cinematography_score)
        .bind(input.overall_score)
        .bind(input.score)
        .fetch_one(&mut *conn)
        .await
}
