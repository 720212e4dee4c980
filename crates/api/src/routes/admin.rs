use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// GET  /users                -> list_users
/// PUT  /users/{id}/role      -> set_role
/// POST /rating-stats/rebuild -> rebuild_rating_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/rating-stats/rebuild", post(admin::rebuild_rating_stats))
}
