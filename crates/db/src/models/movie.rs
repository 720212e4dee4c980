//! Movie entity model and DTOs.

use chrono::NaiveDate;
use cinebuff_core::movie::MovieSort;
use cinebuff_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub synopsis: String,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
    pub content_type: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movie as shown in list results: genre names plus its cached rating.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieListItem {
    pub id: DbId,
    pub title: String,
    pub synopsis: String,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
    pub content_type: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Genre names, alphabetical.
    pub genres: Vec<String>,
    /// Cached weighted average; `None` when the movie is not rated.
    pub weighted_average: Option<f64>,
    pub total_ratings: i32,
}

/// DTO for adding a movie to the catalogue.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub synopsis: String,
    pub release_date: NaiveDate,
    #[validate(url)]
    pub poster_url: Option<String>,
    /// `"movie"` (default) or `"series"`.
    pub content_type: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<DbId>,
}

/// Filters for listing movies. Built by the handler from query parameters.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Case-insensitive match on title or synopsis.
    pub search: Option<String>,
    /// Exact genre name.
    pub genre: Option<String>,
    pub sort: MovieSort,
    /// Caller id, required for [`MovieSort::MyRatings`].
    pub user_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
