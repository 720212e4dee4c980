//! Repository for `communities` and `community_members`.

use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::community::{Community, CommunityWithStats, MemberWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, genre_id, name, description, created_at, updated_at";

/// Select list for [`CommunityWithStats`]; `$1` is the viewer id (nullable).
const STATS_COLUMNS: &str = "\
    c.id, c.genre_id, g.name AS genre_name, c.name, c.description, \
    (SELECT COUNT(*) FROM community_members cm WHERE cm.community_id = c.id) AS member_count, \
    EXISTS (SELECT 1 FROM community_members cm \
            WHERE cm.community_id = c.id AND cm.user_id = $1) AS is_member, \
    c.created_at";

/// Provides CRUD and membership operations for communities.
pub struct CommunityRepo;

impl CommunityRepo {
    // -----------------------------------------------------------------------
    // Communities
    // -----------------------------------------------------------------------

    /// Create a community for a genre. A second community for the same genre
    /// fails with `uq_communities_genre`.
    pub async fn create(
        pool: &PgPool,
        genre_id: DbId,
        name: &str,
        description: &str,
    ) -> Result<Community, sqlx::Error> {
        let query = format!(
            "INSERT INTO communities (genre_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Community>(&query)
            .bind(genre_id)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Find a community by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Community>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communities WHERE id = $1");
        sqlx::query_as::<_, Community>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a community with member count and the viewer's membership.
    pub async fn find_with_stats(
        pool: &PgPool,
        id: DbId,
        viewer_id: Option<DbId>,
    ) -> Result<Option<CommunityWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {STATS_COLUMNS}
             FROM communities c JOIN genres g ON g.id = c.genre_id
             WHERE c.id = $2"
        );
        sqlx::query_as::<_, CommunityWithStats>(&query)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all communities by name, with member counts and membership.
    pub async fn list_with_stats(
        pool: &PgPool,
        viewer_id: Option<DbId>,
    ) -> Result<Vec<CommunityWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {STATS_COLUMNS}
             FROM communities c JOIN genres g ON g.id = c.genre_id
             ORDER BY c.name"
        );
        sqlx::query_as::<_, CommunityWithStats>(&query)
            .bind(viewer_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Add a user to a community. Returns `false` if already a member.
    pub async fn join(pool: &PgPool, community_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)
             ON CONFLICT (community_id, user_id) DO NOTHING",
        )
        .bind(community_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a user from a community. Returns `true` if they were a member.
    pub async fn leave(pool: &PgPool, community_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
                .bind(community_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a user belongs to a community.
    pub async fn is_member(
        pool: &PgPool,
        community_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2)",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Members of a community in join order.
    pub async fn list_members(
        pool: &PgPool,
        community_id: DbId,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithUser>(
            "SELECT u.id AS user_id, u.username, cm.is_admin, cm.joined_at
             FROM community_members cm
             JOIN users u ON u.id = cm.user_id
             WHERE cm.community_id = $1
             ORDER BY cm.joined_at, cm.id",
        )
        .bind(community_id)
        .fetch_all(pool)
        .await
    }
}
