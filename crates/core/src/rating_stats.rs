//! Movie rating aggregation.
//!
//! Computes the cached per-movie summary from the full set of a movie's
//! ratings. The caller passes each rating together with its author's role;
//! nothing here looks the role up on its own.
//!
//! Only `Role::User` counts toward the user split and only `Role::Critic`
//! toward the critic split. Admin ratings are included in the total count,
//! the weighted average and the category averages, but in neither
//! role-specific average.

use serde::Serialize;

use crate::rating::{calculated_overall_score, round_one_decimal, CategoryScores};
use crate::roles::Role;

/// One rating as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedScore {
    pub role: Role,
    pub scores: CategoryScores,
}

impl RatedScore {
    pub fn new(role: Role, scores: CategoryScores) -> Self {
        Self { role, scores }
    }
}

/// Aggregate statistics for one movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub total_ratings: i32,
    pub user_ratings_count: i32,
    pub critic_ratings_count: i32,
    pub weighted_average: f64,
    pub user_average: f64,
    pub critic_average: f64,
    pub story_average: f64,
    pub acting_average: f64,
    pub cinematography_average: f64,
}

/// Aggregate a movie's ratings.
///
/// Returns `None` when there are no ratings; the caller must then remove
/// any cached summary rather than store zeros.
pub fn aggregate(ratings: &[RatedScore]) -> Option<RatingSummary> {
    if ratings.is_empty() {
        return None;
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut user_scores: Vec<f64> = Vec::new();
    let mut critic_scores: Vec<f64> = Vec::new();

    for rating in ratings {
        let overall = calculated_overall_score(&rating.scores);
        let weight = rating.role.rating_weight();
        weighted_sum += weight * overall;
        weight_total += weight;

        match rating.role {
            Role::User => user_scores.push(overall),
            Role::Critic => critic_scores.push(overall),
            Role::Admin => {}
        }
    }

    let story: Vec<f64> = ratings.iter().map(|r| f64::from(r.scores.story)).collect();
    let acting: Vec<f64> = ratings.iter().map(|r| f64::from(r.scores.acting)).collect();
    let cinematography: Vec<f64> = ratings
        .iter()
        .map(|r| f64::from(r.scores.cinematography))
        .collect();

    Some(RatingSummary {
        total_ratings: count(ratings.len()),
        user_ratings_count: count(user_scores.len()),
        critic_ratings_count: count(critic_scores.len()),
        weighted_average: round_one_decimal(weighted_sum / weight_total),
        user_average: rounded_mean(&user_scores),
        critic_average: rounded_mean(&critic_scores),
        story_average: rounded_mean(&story),
        acting_average: rounded_mean(&acting),
        cinematography_average: rounded_mean(&cinematography),
    })
}

/// A rating count as stored in the `INTEGER` stats columns, saturating at
/// `i32::MAX`.
fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Mean rounded to one decimal, or `0.0` for an empty slice.
fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round_one_decimal(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(role: Role, story: i32, acting: i32, cinematography: i32) -> RatedScore {
        RatedScore::new(
            role,
            CategoryScores::new(story, acting, cinematography).unwrap(),
        )
    }

    #[test]
    fn empty_set_has_no_summary() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn user_and_critic_example() {
        let summary = aggregate(&[
            rated(Role::User, 8, 6, 7),
            rated(Role::Critic, 10, 10, 10),
        ])
        .unwrap();

        assert_eq!(summary.total_ratings, 2);
        assert_eq!(summary.user_ratings_count, 1);
        assert_eq!(summary.critic_ratings_count, 1);
        assert_eq!(summary.weighted_average, 9.0);
        assert_eq!(summary.user_average, 7.0);
        assert_eq!(summary.critic_average, 10.0);
        assert_eq!(summary.story_average, 9.0);
        assert_eq!(summary.acting_average, 8.0);
        assert_eq!(summary.cinematography_average, 8.5);
    }

    #[test]
    fn admin_ratings_count_only_in_total_and_weighted() {
        let summary = aggregate(&[rated(Role::Admin, 4, 4, 4), rated(Role::User, 8, 8, 8)]).unwrap();

        assert_eq!(summary.total_ratings, 2);
        assert_eq!(summary.user_ratings_count, 1);
        assert_eq!(summary.critic_ratings_count, 0);
        // Admin weighs 1.0: (4 + 8) / 2.
        assert_eq!(summary.weighted_average, 6.0);
        assert_eq!(summary.user_average, 8.0);
        assert_eq!(summary.critic_average, 0.0);
        assert_eq!(summary.story_average, 6.0);
    }

    #[test]
    fn only_admin_ratings_leave_role_averages_at_zero() {
        let summary = aggregate(&[rated(Role::Admin, 6, 7, 8)]).unwrap();
        assert_eq!(summary.total_ratings, 1);
        assert_eq!(summary.user_ratings_count, 0);
        assert_eq!(summary.critic_ratings_count, 0);
        assert_eq!(summary.weighted_average, 7.0);
        assert_eq!(summary.user_average, 0.0);
        assert_eq!(summary.critic_average, 0.0);
    }

    #[test]
    fn weighted_average_uses_rounded_per_rating_scores() {
        // 7.3 (user) and 7.7 (critic, weight 2): (7.3 + 15.4) / 3 = 7.5666...
        let summary = aggregate(&[
            rated(Role::User, 7, 7, 8),
            rated(Role::Critic, 8, 8, 7),
        ])
        .unwrap();
        assert_eq!(summary.weighted_average, 7.6);
    }

    #[test]
    fn category_averages_round_to_one_decimal() {
        let summary = aggregate(&[
            rated(Role::User, 1, 3, 5),
            rated(Role::User, 2, 3, 5),
            rated(Role::User, 2, 4, 5),
        ])
        .unwrap();
        // 5 / 3 = 1.666...
        assert_eq!(summary.story_average, 1.7);
        // 10 / 3 = 3.333...
        assert_eq!(summary.acting_average, 3.3);
        assert_eq!(summary.cinematography_average, 5.0);
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        assert_eq!(count(3), 3);
        assert_eq!(count(usize::MAX), i32::MAX);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let ratings = [
            rated(Role::User, 3, 9, 4),
            rated(Role::Critic, 6, 2, 8),
            rated(Role::Admin, 10, 1, 7),
        ];
        assert_eq!(aggregate(&ratings), aggregate(&ratings));
    }
}
