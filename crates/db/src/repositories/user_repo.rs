//! Repository for the `users` table and the per-user genre preferences.

use cinebuff_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::genre::Genre;
use crate::models::user::{CreateUser, PublicProfile, User, UserResponse};
use crate::repositories::RatingStatsRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role_id, bio, is_active, \
                        last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Columns of [`UserResponse`], relative to aliases `u` (users) and `r` (roles).
const RESPONSE_COLUMNS: &str = "u.id, u.username, u.email, r.name AS role, u.bio, \
                                 u.is_active, u.last_login_at, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's API representation, with the role name resolved.
    pub async fn find_response_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List users, most recently created first.
    pub async fn list_responses(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id
             ORDER BY u.created_at DESC, u.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Change a user's role and refresh the stats of every movie they rated,
    /// in one transaction.
    ///
    /// The `UPDATE` waits for rating writes holding the user's row share
    /// lock, so ratings committed by those writes are recomputed here.
    ///
    /// Returns `None` if the user does not exist.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("UPDATE users SET role_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let Some(user) = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let movies = RatingStatsRepo::recompute_for_user(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(user_id = id, role_id, movies, "User role changed");
        Ok(Some(user))
    }

    // -----------------------------------------------------------------------
    // Login bookkeeping
    // -----------------------------------------------------------------------

    /// Increment the failed login counter and return the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock a user account until the specified timestamp.
    ///
    /// The failure counter restarts at zero, so once the lock expires the
    /// user again gets the full number of attempts.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, failed_login_count = 0 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset the failure counter, clear any lock
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    /// Replace a user's bio. Returns `false` if the user does not exist.
    pub async fn update_bio(pool: &PgPool, id: DbId, bio: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET bio = $2 WHERE id = $1")
            .bind(id)
            .bind(bio)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Public profile of an active user, with rating and review counts.
    pub async fn public_profile(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PublicProfile>, sqlx::Error> {
        sqlx::query_as::<_, PublicProfile>(
            "SELECT u.id, u.username, r.name AS role, u.bio,
                    (SELECT COUNT(*) FROM ratings ra WHERE ra.user_id = u.id) AS rating_count,
                    (SELECT COUNT(*) FROM reviews rv WHERE rv.user_id = u.id) AS review_count,
                    u.created_at
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1 AND u.is_active = true",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Replace the full set of a user's favorite genres.
    pub async fn set_favorite_genres(
        pool: &PgPool,
        user_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM user_favorite_genres WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_favorite_genres (user_id, genre_id)
             SELECT $1, g FROM UNNEST($2::bigint[]) AS g
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// A user's favorite genres, alphabetical.
    pub async fn favorite_genres(pool: &PgPool, user_id: DbId) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.description, g.created_at
             FROM user_favorite_genres ufg
             JOIN genres g ON g.id = ufg.genre_id
             WHERE ufg.user_id = $1
             ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
