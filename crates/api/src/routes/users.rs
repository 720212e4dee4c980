use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}             -> get_profile
/// PUT    /{id}/connection  -> connect
/// DELETE /{id}/connection  -> disconnect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(users::get_profile))
        .route(
            "/{id}/connection",
            put(users::connect).delete(users::disconnect),
        )
}
