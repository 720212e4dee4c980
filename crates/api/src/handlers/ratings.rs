//! Handlers for the `/ratings` resource.
//!
//! Every write goes through [`RatingRepo`], which refreshes the movie's
//! cached statistics in the same transaction. Responses carry the
//! refreshed statistics so clients never need a second round trip.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::community::can_delete;
use cinebuff_core::types::DbId;
use cinebuff_db::models::rating::{
    CreateRating, Rating, RatingChange, RatingFilter, RatingScores, UpdateRating,
};
use cinebuff_db::models::rating_stats::RatingStats;
use cinebuff_db::repositories::RatingRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::OwnershipFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A rating row with its derived scores.
#[derive(Debug, Serialize)]
pub struct ScoredRating<T: Serialize> {
    #[serde(flatten)]
    pub rating: T,
    /// Mean of the three category scores, one decimal.
    pub calculated_overall_score: f64,
    /// Score shown to readers; legacy fields win when present.
    pub effective_score: f64,
}

impl<T: Serialize + RatingScores> ScoredRating<T> {
    /// Attach derived scores to a stored rating.
    pub fn new(rating: T) -> Self {
        Self {
            calculated_overall_score: rating.calculated_overall_score(),
            effective_score: rating.effective_score(),
            rating,
        }
    }
}

/// A rating mutation together with the movie's refreshed statistics.
///
/// `stats` is `null` when the movie has no ratings left.
#[derive(Debug, Serialize)]
pub struct RatingChangeResponse {
    pub rating: ScoredRating<Rating>,
    pub stats: Option<RatingStats>,
}

impl From<RatingChange> for RatingChangeResponse {
    fn from(change: RatingChange) -> Self {
        Self {
            rating: ScoredRating::new(change.rating),
            stats: change.stats,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/ratings?movie_id=&user_id=&limit=&offset=
///
/// The caller's own ratings. Admins see everyone's and may filter by
/// `user_id`.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OwnershipFilterParams>,
) -> AppResult<Json<DataResponse<Vec<ScoredRating<Rating>>>>> {
    let (limit, offset) = params.clamped();
    let user_id = if auth.is_admin() {
        params.user_id
    } else {
        Some(auth.user_id)
    };
    let filter = RatingFilter {
        movie_id: params.movie_id,
        user_id,
        limit,
        offset,
    };
    let ratings = RatingRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: ratings.into_iter().map(ScoredRating::new).collect(),
    }))
}

/// POST /api/v1/ratings
///
/// Rate a movie. A second rating of the same movie by the same user is a
/// 409; use `PUT /movies/{id}/rating` to replace it.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRating>,
) -> AppResult<(StatusCode, Json<DataResponse<RatingChangeResponse>>)> {
    input.validate()?;

    let change = RatingRepo::create(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", input.movie_id))?;

    tracing::info!(
        rating_id = change.rating.id,
        movie_id = change.rating.movie_id,
        user_id = auth.user_id,
        "Rating created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: change.into(),
        }),
    ))
}

/// GET /api/v1/ratings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ScoredRating<Rating>>>> {
    let rating = RatingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;
    Ok(Json(DataResponse {
        data: ScoredRating::new(rating),
    }))
}

/// PUT /api/v1/ratings/{id}
///
/// Change some or all scores of one's own rating.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRating>,
) -> AppResult<Json<DataResponse<RatingChangeResponse>>> {
    input.validate()?;

    let existing = RatingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;
    if existing.user_id != auth.user_id {
        return Err(AppError::forbidden("You can only edit your own ratings"));
    }

    let change = RatingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;

    tracing::info!(
        rating_id = id,
        movie_id = change.rating.movie_id,
        user_id = auth.user_id,
        "Rating updated"
    );

    Ok(Json(DataResponse {
        data: change.into(),
    }))
}

/// DELETE /api/v1/ratings/{id}
///
/// Authors may delete their own ratings; admins may delete any.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = RatingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;
    if !can_delete(existing.user_id, auth.user_id, auth.role) {
        return Err(AppError::forbidden("You can only delete your own ratings"));
    }

    let change = RatingRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;

    tracing::info!(
        rating_id = id,
        movie_id = change.rating.movie_id,
        user_id = auth.user_id,
        stats_removed = change.stats.is_none(),
        "Rating deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
