//! Community entity model and DTOs.

use cinebuff_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `communities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Community {
    pub id: DbId,
    pub genre_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A community with its genre name, member count and the caller's membership.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommunityWithStats {
    pub id: DbId,
    pub genre_id: DbId,
    pub genre_name: String,
    pub name: String,
    pub description: String,
    pub member_count: i64,
    /// Always `false` for anonymous callers.
    pub is_member: bool,
    pub created_at: Timestamp,
}

/// A community member joined with the user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithUser {
    pub user_id: DbId,
    pub username: String,
    pub is_admin: bool,
    pub joined_at: Timestamp,
}

/// A row from the `community_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub id: DbId,
    pub community_id: DbId,
    pub user_id: DbId,
    pub is_admin: bool,
    pub joined_at: Timestamp,
}

/// DTO for creating a community. The name defaults to the genre's name.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommunity {
    pub genre_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}
