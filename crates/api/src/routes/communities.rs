use axum::routing::{get, put};
use axum::Router;

use crate::handlers::communities;
use crate::state::AppState;

/// Routes mounted at `/communities`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}/membership   -> join
/// DELETE /{id}/membership   -> leave
/// GET    /{id}/posts        -> list_posts
/// POST   /{id}/posts        -> create_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(communities::list).post(communities::create))
        .route("/{id}", get(communities::get_by_id))
        .route(
            "/{id}/membership",
            put(communities::join).delete(communities::leave),
        )
        .route(
            "/{id}/posts",
            get(communities::list_posts).post(communities::create_post),
        )
}
