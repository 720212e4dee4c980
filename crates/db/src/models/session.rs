//! Refresh-token sessions.

use cinebuff_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `user_sessions`. Only the SHA-256 digest of the refresh token
/// is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for [`SessionRepo::create`](crate::repositories::SessionRepo::create).
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
