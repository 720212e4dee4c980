//! Handlers for the `/reviews` resource.
//!
//! Reviews are written through `PUT /movies/{id}/review`; this resource
//! covers reading and deleting them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::community::can_delete;
use cinebuff_core::types::DbId;
use cinebuff_db::models::review::ReviewWithAuthor;
use cinebuff_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::OwnershipFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reviews?movie_id=&user_id=&limit=&offset=
///
/// Lists the caller's own reviews. Admins see everyone's and may filter
/// by `user_id`.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OwnershipFilterParams>,
) -> AppResult<Json<DataResponse<Vec<ReviewWithAuthor>>>> {
    let (limit, offset) = params.clamped();
    let user_id = if auth.is_admin() {
        params.user_id
    } else {
        Some(auth.user_id)
    };
    let reviews = ReviewRepo::list(&state.pool, params.movie_id, user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/reviews/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReviewWithAuthor>>> {
    let review = ReviewRepo::find_with_author(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", id))?;
    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
///
/// Authors may delete their own reviews; admins may delete any.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let review = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", id))?;
    if !can_delete(review.user_id, auth.user_id, auth.role) {
        return Err(AppError::forbidden("You can only delete your own reviews"));
    }

    if !ReviewRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Review", id));
    }
    tracing::info!(review_id = id, movie_id = review.movie_id, user_id = auth.user_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}
