//! Per-rating score math and validation.
//!
//! A rating is made of three category scores (story, acting,
//! cinematography), each an integer in `[1, 10]`. Two legacy fields are
//! kept for ratings imported from the old 1-5 star form.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest allowed category score.
pub const MIN_CATEGORY_SCORE: i32 = 1;

/// Highest allowed category score.
pub const MAX_CATEGORY_SCORE: i32 = 10;

/// Multiplier converting a legacy star score to the 1-10 scale.
const LEGACY_STARS_TO_TEN: f64 = 2.0;

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to one decimal place, ties away from zero.
///
/// Every average the service publishes goes through this function so the
/// tie-break rule is the same everywhere.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Category scores
// ---------------------------------------------------------------------------

/// The three category scores of a single rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub story: i32,
    pub acting: i32,
    pub cinematography: i32,
}

impl CategoryScores {
    /// Build a validated set of category scores.
    pub fn new(story: i32, acting: i32, cinematography: i32) -> Result<Self, CoreError> {
        validate_category_score("story_score", story)?;
        validate_category_score("acting_score", acting)?;
        validate_category_score("cinematography_score", cinematography)?;
        Ok(Self {
            story,
            acting,
            cinematography,
        })
    }

    /// Sum of the three category scores.
    pub fn total(&self) -> i32 {
        self.story + self.acting + self.cinematography
    }
}

/// Validate that a category score lies in `[1, 10]`.
pub fn validate_category_score(field: &str, value: i32) -> Result<(), CoreError> {
    if !(MIN_CATEGORY_SCORE..=MAX_CATEGORY_SCORE).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between {MIN_CATEGORY_SCORE} and {MAX_CATEGORY_SCORE}, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Overall score of a rating: the mean of its category scores, rounded to
/// one decimal.
pub fn calculated_overall_score(scores: &CategoryScores) -> f64 {
    round_one_decimal(f64::from(scores.total()) / 3.0)
}

/// Score shown for a single rating on the 1-10 scale.
///
/// A legacy `overall_score` wins, then a legacy star `score` doubled, and
/// otherwise the calculated overall score.
pub fn effective_score(
    overall_score: Option<i32>,
    legacy_score: Option<i32>,
    scores: &CategoryScores,
) -> f64 {
    match (overall_score, legacy_score) {
        (Some(overall), _) => f64::from(overall),
        (None, Some(stars)) => f64::from(stars) * LEGACY_STARS_TO_TEN,
        (None, None) => calculated_overall_score(scores),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn scores(story: i32, acting: i32, cinematography: i32) -> CategoryScores {
        CategoryScores::new(story, acting, cinematography).unwrap()
    }

    #[test]
    fn accepts_scores_at_bounds() {
        assert!(CategoryScores::new(1, 10, 5).is_ok());
    }

    #[test]
    fn rejects_out_of_range_scores() {
        assert_matches!(
            CategoryScores::new(0, 5, 5),
            Err(CoreError::Validation(msg)) if msg.contains("story_score")
        );
        assert_matches!(
            CategoryScores::new(5, 11, 5),
            Err(CoreError::Validation(msg)) if msg.contains("acting_score")
        );
        assert_matches!(
            CategoryScores::new(5, 5, -3),
            Err(CoreError::Validation(msg)) if msg.contains("cinematography_score")
        );
    }

    #[test]
    fn overall_score_is_rounded_mean() {
        assert_eq!(calculated_overall_score(&scores(8, 6, 7)), 7.0);
        assert_eq!(calculated_overall_score(&scores(10, 10, 10)), 10.0);
        assert_eq!(calculated_overall_score(&scores(1, 1, 2)), 1.3);
        assert_eq!(calculated_overall_score(&scores(7, 7, 8)), 7.3);
        assert_eq!(calculated_overall_score(&scores(8, 8, 7)), 7.7);
    }

    #[test]
    fn rounding_breaks_ties_away_from_zero() {
        assert_eq!(round_one_decimal(1.75), 1.8);
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(6.04), 6.0);
    }

    #[test]
    fn effective_score_prefers_legacy_fields() {
        let s = scores(4, 5, 6);
        assert_eq!(effective_score(Some(9), Some(2), &s), 9.0);
        assert_eq!(effective_score(None, Some(3), &s), 6.0);
        assert_eq!(effective_score(None, None, &s), 5.0);
    }
}
