//! Cached per-movie rating statistics.

use cinebuff_core::rating_stats::RatingSummary;
use cinebuff_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rating_stats` table.
///
/// Never written directly; always derived from the movie's current ratings.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RatingStats {
    pub movie_id: DbId,
    pub total_ratings: i32,
    pub user_ratings_count: i32,
    pub critic_ratings_count: i32,
    pub weighted_average: f64,
    pub user_average: f64,
    pub critic_average: f64,
    pub story_average: f64,
    pub acting_average: f64,
    pub cinematography_average: f64,
    pub updated_at: Timestamp,
}

impl RatingStats {
    /// The aggregate values without the row's bookkeeping columns.
    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            total_ratings: self.total_ratings,
            user_ratings_count: self.user_ratings_count,
            critic_ratings_count: self.critic_ratings_count,
            weighted_average: self.weighted_average,
            user_average: self.user_average,
            critic_average: self.critic_average,
            story_average: self.story_average,
            acting_average: self.acting_average,
            cinematography_average: self.cinematography_average,
        }
    }
}

/// One rating as read for aggregation: category scores plus author role.
#[derive(Debug, Clone, FromRow)]
pub struct ScoredRatingRow {
    pub story_score: i32,
    pub acting_score: i32,
    pub cinematography_score: i32,
    pub role: String,
}
