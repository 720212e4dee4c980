//! Route definitions for the `/movies` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// GET    /{id}/ratings   -> list_ratings
/// PUT    /{id}/rating    -> put_my_rating
/// DELETE /{id}/rating    -> delete_my_rating
/// GET    /{id}/stats     -> get_stats
/// GET    /{id}/reviews   -> list_reviews
/// PUT    /{id}/review    -> put_my_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route("/{id}", get(movies::get_by_id))
        .route("/{id}/ratings", get(movies::list_ratings))
        .route(
            "/{id}/rating",
            put(movies::put_my_rating).delete(movies::delete_my_rating),
        )
        .route("/{id}/stats", get(movies::get_stats))
        .route("/{id}/reviews", get(movies::list_reviews))
        .route("/{id}/review", put(movies::put_my_review))
}
