//! Repository for the `rating_stats` cache.
//!
//! The cache is only ever written by [`RatingStatsRepo::recompute`], which
//! runs on the caller's connection so it shares the transaction of the
//! rating write that triggered it.

use cinebuff_core::rating::CategoryScores;
use cinebuff_core::rating_stats::{aggregate, RatedScore};
use cinebuff_core::roles::Role;
use cinebuff_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::rating_stats::{RatingStats, ScoredRatingRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "movie_id, total_ratings, user_ratings_count, critic_ratings_count, \
                        weighted_average, user_average, critic_average, \
                        story_average, acting_average, cinematography_average, updated_at";

/// Provides access to cached per-movie rating statistics.
pub struct RatingStatsRepo;

impl RatingStatsRepo {
    /// Rebuild the cached statistics of one movie from its current ratings.
    ///
    /// Deletes the cache row when the movie has no ratings and returns
    /// `None`. Must run on the same transaction as the rating write.
    pub async fn recompute(
        conn: &mut PgConnection,
        movie_id: DbId,
    ) -> Result<Option<RatingStats>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ScoredRatingRow>(
            "SELECT r.story_score, r.acting_score, r.cinematography_score, ro.name AS role
             FROM ratings r
             JOIN users u ON u.id = r.user_id
             JOIN roles ro ON ro.id = u.role_id
             WHERE r.movie_id = $1
             ORDER BY r.id",
        )
        .bind(movie_id)
        .fetch_all(&mut *conn)
        .await?;

        let rated = rows
            .iter()
            .map(to_rated_score)
            .collect::<Result<Vec<_>, _>>()?;

        let Some(summary) = aggregate(&rated) else {
            sqlx::query("DELETE FROM rating_stats WHERE movie_id = $1")
                .bind(movie_id)
                .execute(&mut *conn)
                .await?;
            tracing::debug!(movie_id, "Rating stats removed");
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO rating_stats
                (movie_id, total_ratings, user_ratings_count, critic_ratings_count,
                 weighted_average, user_average, critic_average,
                 story_average, acting_average, cinematography_average, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
             ON CONFLICT (movie_id) DO UPDATE SET
                total_ratings = EXCLUDED.total_ratings,
                user_ratings_count = EXCLUDED.user_ratings_count,
                critic_ratings_count = EXCLUDED.critic_ratings_count,
                weighted_average = EXCLUDED.weighted_average,
                user_average = EXCLUDED.user_average,
                critic_average = EXCLUDED.critic_average,
                story_average = EXCLUDED.story_average,
                acting_average = EXCLUDED.acting_average,
                cinematography_average = EXCLUDED.cinematography_average,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let stats = sqlx::query_as::<_, RatingStats>(&query)
            .bind(movie_id)
            .bind(summary.total_ratings)
            .bind(summary.user_ratings_count)
            .bind(summary.critic_ratings_count)
            .bind(summary.weighted_average)
            .bind(summary.user_average)
            .bind(summary.critic_average)
            .bind(summary.story_average)
            .bind(summary.acting_average)
            .bind(summary.cinematography_average)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(
            movie_id,
            total_ratings = stats.total_ratings,
            weighted_average = stats.weighted_average,
            "Rating stats recomputed",
        );
        Ok(Some(stats))
    }

    /// Find the cached statistics of a movie. `None` means "Not Rated".
    pub async fn find_by_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Option<RatingStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rating_stats WHERE movie_id = $1");
        sqlx::query_as::<_, RatingStats>(&query)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Recompute every movie the user has rated.
    ///
    /// Used when the user's role changes, since the role decides which split
    /// and which weight their ratings count toward. Locks the affected movie
    /// rows in id order before recomputing. Returns the number of movies.
    pub async fn recompute_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let movie_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT m.id FROM movies m
             WHERE EXISTS (SELECT 1 FROM ratings r WHERE r.movie_id = m.id AND r.user_id = $1)
             ORDER BY m.id
             FOR UPDATE",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        for movie_id in &movie_ids {
            Self::recompute(&mut *conn, *movie_id).await?;
        }
        Ok(movie_ids.len() as u64)
    }

    /// Recompute the cache of every movie, one transaction per movie.
    ///
    /// Each movie row is locked the same way rating writes lock it, so a
    /// rebuild never interleaves with a concurrent rating change. Returns the
    /// number of movies processed.
    pub async fn rebuild_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let movie_ids: Vec<DbId> = sqlx::query_scalar("SELECT id FROM movies ORDER BY id")
            .fetch_all(pool)
            .await?;

        let mut processed = 0u64;
        for movie_id in movie_ids {
            let mut tx = pool.begin().await?;
            let locked: Option<DbId> =
                sqlx::query_scalar("SELECT id FROM movies WHERE id = $1 FOR UPDATE")
                    .bind(movie_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if locked.is_none() {
                // Deleted since the id list was read.
                continue;
            }
            Self::recompute(&mut *tx, movie_id).await?;
            tx.commit().await?;
            processed += 1;
        }

        tracing::info!(movies = processed, "Rating stats rebuilt");
        Ok(processed)
    }
}

fn to_rated_score(row: &ScoredRatingRow) -> Result<RatedScore, sqlx::Error> {
    let role = Role::from_str_value(&row.role).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let scores = CategoryScores::new(row.story_score, row.acting_score, row.cinematography_score)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(RatedScore::new(role, scores))
}
