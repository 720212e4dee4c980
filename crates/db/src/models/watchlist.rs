//! Watchlist and favorites models.
//!
//! Both lists share one shape: a per-user set of movies with the time each
//! one was added.

use chrono::NaiveDate;
use cinebuff_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `watchlist_items` or `favorites`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub added_at: Timestamp,
}

/// A list entry joined with the movie it points at.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListedMovie {
    pub movie_id: DbId,
    pub title: String,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
    pub content_type: String,
    pub weighted_average: Option<f64>,
    pub added_at: Timestamp,
}

/// Outcome of an idempotent add to a list.
#[derive(Debug, Clone, Serialize)]
pub struct ListChange {
    pub entry: ListEntry,
    /// `false` when the movie was already on the list.
    pub created: bool,
}
