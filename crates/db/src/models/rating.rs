//! Rating entity model and DTOs.

use cinebuff_core::rating::{calculated_overall_score, effective_score, CategoryScores};
use cinebuff_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::rating_stats::RatingStats;

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub story_score: i32,
    pub acting_score: i32,
    pub cinematography_score: i32,
    pub overall_score: Option<i32>,
    pub score: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating joined with its author, as listed on a movie page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingWithAuthor {
    pub id: DbId,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub username: String,
    pub role: String,
    pub story_score: i32,
    pub acting_score: i32,
    pub cinematography_score: i32,
    pub overall_score: Option<i32>,
    pub score: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A rating joined with the rated movie's title, for "my ratings".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingWithMovie {
    pub id: DbId,
    pub movie_id: DbId,
    pub movie_title: String,
    pub story_score: i32,
    pub acting_score: i32,
    pub cinematography_score: i32,
    pub overall_score: Option<i32>,
    pub score: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Score derivations shared by every row shape that carries a rating's
/// scores.
///
/// Stored scores are range-checked by the table's constraints, so the
/// category scores are read back without validation.
pub trait RatingScores {
    fn category_scores(&self) -> CategoryScores;

    /// `(overall_score, score)`, the two legacy fields.
    fn legacy_scores(&self) -> (Option<i32>, Option<i32>);

    /// Mean of the three category scores, one decimal.
    fn calculated_overall_score(&self) -> f64 {
        calculated_overall_score(&self.category_scores())
    }

    /// Score shown for this rating on the 1-10 scale.
    fn effective_score(&self) -> f64 {
        let (overall, legacy) = self.legacy_scores();
        effective_score(overall, legacy, &self.category_scores())
    }
}

macro_rules! impl_rating_scores {
    ($($row:ty),+) => {
        $(
            impl RatingScores for $row {
                fn category_scores(&self) -> CategoryScores {
                    CategoryScores {
                        story: self.story_score,
                        acting: self.acting_score,
                        cinematography: self.cinematography_score,
                    }
                }

                fn legacy_scores(&self) -> (Option<i32>, Option<i32>) {
                    (self.overall_score, self.score)
                }
            }
        )+
    };
}

impl_rating_scores!(Rating, RatingWithAuthor, RatingWithMovie);

/// Scores submitted when rating a movie.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateMovie {
    #[validate(range(min = 1, max = 10))]
    pub story_score: i32,
    #[validate(range(min = 1, max = 10))]
    pub acting_score: i32,
    #[validate(range(min = 1, max = 10))]
    pub cinematography_score: i32,
    /// Legacy overall score on the 1-10 scale.
    #[validate(range(min = 1, max = 10))]
    pub overall_score: Option<i32>,
    /// Legacy 1-5 star score.
    #[validate(range(min = 1, max = 5))]
    pub score: Option<i32>,
}

/// DTO for creating a rating through the `/ratings` resource.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRating {
    pub movie_id: DbId,
    #[serde(flatten)]
    #[validate(nested)]
    pub scores: RateMovie,
}

/// DTO for a partial rating update. Absent fields keep their value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRating {
    #[validate(range(min = 1, max = 10))]
    pub story_score: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub acting_score: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub cinematography_score: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub overall_score: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub score: Option<i32>,
}

/// Filters for the `/ratings` listing.
#[derive(Debug, Clone, Default)]
pub struct RatingFilter {
    pub movie_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}

/// A rating after a write, together with the movie's refreshed statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RatingChange {
    pub rating: Rating,
    /// `None` when the movie no longer has any ratings.
    pub stats: Option<RatingStats>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn rating(overall_score: Option<i32>, score: Option<i32>) -> Rating {
        Rating {
            id: 1,
            user_id: 1,
            movie_id: 1,
            story_score: 8,
            acting_score: 6,
            cinematography_score: 7,
            overall_score,
            score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn derived_scores_follow_legacy_precedence() {
        assert_eq!(rating(None, None).calculated_overall_score(), 7.0);
        assert_eq!(rating(None, None).effective_score(), 7.0);
        assert_eq!(rating(None, Some(4)).effective_score(), 8.0);
        assert_eq!(rating(Some(3), Some(4)).effective_score(), 3.0);
        // The calculated score ignores legacy fields.
        assert_eq!(rating(Some(3), None).calculated_overall_score(), 7.0);
    }

    #[test]
    fn legacy_ranges_are_declared_on_the_dto() {
        let valid = RateMovie {
            story_score: 5,
            acting_score: 5,
            cinematography_score: 5,
            overall_score: Some(10),
            score: Some(5),
        };
        assert!(valid.validate().is_ok());

        let stars_too_high = RateMovie {
            score: Some(6),
            ..valid.clone()
        };
        assert!(stars_too_high.validate().is_err());

        let category_too_low = RateMovie {
            story_score: 0,
            ..valid
        };
        assert!(category_too_low.validate().is_err());
    }
}
