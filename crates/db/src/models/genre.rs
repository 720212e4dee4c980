//! Genre entity model and DTOs.

use cinebuff_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a genre.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}
