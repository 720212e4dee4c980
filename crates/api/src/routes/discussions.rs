use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::discussions;
use crate::state::AppState;

/// Post and comment routes, merged at the `/api/v1` root.
///
/// ```text
/// GET    /posts/{id}           -> get_post
/// DELETE /posts/{id}           -> delete_post
/// POST   /posts/{id}/comments  -> create_comment
/// DELETE /comments/{id}        -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/{id}",
            get(discussions::get_post).delete(discussions::delete_post),
        )
        .route("/posts/{id}/comments", post(discussions::create_comment))
        .route("/comments/{id}", delete(discussions::delete_comment))
}
