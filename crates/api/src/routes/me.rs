use axum::routing::{get, put};
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`. All require authentication.
///
/// ```text
/// GET    /                       -> get_profile
/// PUT    /                       -> update_profile
/// GET    /ratings                -> list_my_ratings
/// GET    /connections            -> list_connections
/// GET    /watchlist              -> list_watchlist
/// PUT    /watchlist/{movie_id}   -> add_to_watchlist
/// DELETE /watchlist/{movie_id}   -> remove_from_watchlist
/// GET    /favorites              -> list_favorites
/// PUT    /favorites/{movie_id}   -> add_to_favorites
/// DELETE /favorites/{movie_id}   -> remove_from_favorites
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::get_profile).put(me::update_profile))
        .route("/ratings", get(me::list_my_ratings))
        .route("/connections", get(me::list_connections))
        .route("/watchlist", get(me::list_watchlist))
        .route(
            "/watchlist/{movie_id}",
            put(me::add_to_watchlist).delete(me::remove_from_watchlist),
        )
        .route("/favorites", get(me::list_favorites))
        .route(
            "/favorites/{movie_id}",
            put(me::add_to_favorites).delete(me::remove_from_favorites),
        )
}
