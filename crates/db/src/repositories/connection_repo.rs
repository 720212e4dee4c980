//! Repository for the `user_connections` table.

use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::connection::{ConnectedUser, Connection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, from_user_id, to_user_id, created_at";

/// Provides follow/unfollow operations between users.
pub struct ConnectionRepo;

impl ConnectionRepo {
    /// Connect `from_user_id` to `to_user_id`.
    ///
    /// Idempotent: returns the existing connection with `false` when already
    /// connected. Connecting to oneself violates `ck_user_connections_not_self`.
    pub async fn connect(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<(Connection, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO user_connections (from_user_id, to_user_id) VALUES ($1, $2)
             ON CONFLICT (from_user_id, to_user_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        if let Some(connection) = sqlx::query_as::<_, Connection>(&insert)
            .bind(from_user_id)
            .bind(to_user_id)
            .fetch_optional(pool)
            .await?
        {
            return Ok((connection, true));
        }

        let select = format!(
            "SELECT {COLUMNS} FROM user_connections WHERE from_user_id = $1 AND to_user_id = $2"
        );
        let connection = sqlx::query_as::<_, Connection>(&select)
            .bind(from_user_id)
            .bind(to_user_id)
            .fetch_one(pool)
            .await?;
        Ok((connection, false))
    }

    /// Remove a connection. Returns `true` if one existed.
    pub async fn disconnect(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_connections WHERE from_user_id = $1 AND to_user_id = $2")
                .bind(from_user_id)
                .bind(to_user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `from_user_id` follows `to_user_id`.
    pub async fn is_connected(
        pool: &PgPool,
        from_user_id: DbId,
        to_user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_connections WHERE from_user_id = $1 AND to_user_id = $2)",
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .fetch_one(pool)
        .await
    }

    /// Users that `user_id` follows, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ConnectedUser>, sqlx::Error> {
        sqlx::query_as::<_, ConnectedUser>(
            "SELECT u.id AS user_id, u.username, r.name AS role, c.created_at AS connected_at
             FROM user_connections c
             JOIN users u ON u.id = c.to_user_id
             JOIN roles r ON r.id = u.role_id
             WHERE c.from_user_id = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
