pub mod admin;
pub mod auth;
pub mod communities;
pub mod discussions;
pub mod genres;
pub mod health;
pub mod me;
pub mod movies;
pub mod ratings;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                               register (public)
/// /auth/login                                  login (public)
/// /auth/refresh                                refresh (public)
/// /auth/logout                                 logout (requires auth)
///
/// /genres                                      list, create (admin)
/// /genres/{id}                                 get
///
/// /movies                                      list (?search, genre, sort), create (critic)
/// /movies/{id}                                 detail
/// /movies/{id}/ratings                         list ratings
/// /movies/{id}/rating                          put, delete own rating
/// /movies/{id}/stats                           cached statistics
/// /movies/{id}/reviews                         list reviews
/// /movies/{id}/review                          put own review
///
/// /ratings                                     list own (admin: all, ?movie_id, user_id), create
/// /ratings/{id}                                get, update (owner), delete (owner/admin)
///
/// /reviews                                     list own (admin: all)
/// /reviews/{id}                                get, delete (owner/admin)
///
/// /me                                          get, update profile
/// /me/ratings                                  own ratings
/// /me/connections                              own connections
/// /me/watchlist                                list
/// /me/watchlist/{movie_id}                     add, remove
/// /me/favorites                                list
/// /me/favorites/{movie_id}                     add, remove
///
/// /users/{id}                                  public profile
/// /users/{id}/connection                       connect, disconnect
///
/// /communities                                 list, create (admin)
/// /communities/{id}                            detail
/// /communities/{id}/membership                 join, leave
/// /communities/{id}/posts                      list, create (members)
///
/// /posts/{id}                                  detail, delete (author/admin)
/// /posts/{id}/comments                         create (members)
/// /comments/{id}                               delete (author/admin)
///
/// /admin/users                                 list (admin only)
/// /admin/users/{id}/role                       set role
/// /admin/rating-stats/rebuild                  recompute all statistics (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/genres", genres::router())
        .nest("/movies", movies::router())
        .nest("/ratings", ratings::router())
        .nest("/reviews", reviews::router())
        .nest("/me", me::router())
        .nest("/users", users::router())
        .nest("/communities", communities::router())
        .merge(discussions::router())
        .nest("/admin", admin::router())
}
