//! User connection model.

use cinebuff_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_connections` table. Connections are directed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Connection {
    pub id: DbId,
    pub from_user_id: DbId,
    pub to_user_id: DbId,
    pub created_at: Timestamp,
}

/// A connected user as listed on "my connections".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConnectedUser {
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    pub connected_at: Timestamp,
}
