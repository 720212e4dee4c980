//! Handlers for the caller's own account under `/me`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::types::DbId;
use cinebuff_db::models::connection::ConnectedUser;
use cinebuff_db::models::genre::Genre;
use cinebuff_db::models::rating::RatingWithMovie;
use cinebuff_db::models::user::{UpdateProfile, UserResponse};
use cinebuff_db::models::watchlist::{ListChange, ListedMovie};
use cinebuff_db::repositories::{
    ConnectionRepo, FavoriteRepo, MovieRepo, RatingRepo, UserRepo, WatchlistRepo,
};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ratings::ScoredRating;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// The caller's account with their favorite genres.
#[derive(Debug, Serialize)]
pub struct MyProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    pub favorite_genres: Vec<Genre>,
}

/// Which per-user movie list a request targets.
#[derive(Debug, Clone, Copy)]
enum MovieList {
    Watchlist,
    Favorites,
}

impl MovieList {
    async fn add(self, state: &AppState, user_id: DbId, movie_id: DbId) -> AppResult<ListChange> {
        let change = match self {
            Self::Watchlist => WatchlistRepo::add(&state.pool, user_id, movie_id).await?,
            Self::Favorites => FavoriteRepo::add(&state.pool, user_id, movie_id).await?,
        };
        Ok(change)
    }

    async fn remove(self, state: &AppState, user_id: DbId, movie_id: DbId) -> AppResult<bool> {
        let removed = match self {
            Self::Watchlist => WatchlistRepo::remove(&state.pool, user_id, movie_id).await?,
            Self::Favorites => FavoriteRepo::remove(&state.pool, user_id, movie_id).await?,
        };
        Ok(removed)
    }

    async fn list(
        self,
        state: &AppState,
        user_id: DbId,
        params: &PaginationParams,
    ) -> AppResult<Vec<ListedMovie>> {
        let (limit, offset) = params.clamped();
        let movies = match self {
            Self::Watchlist => WatchlistRepo::list(&state.pool, user_id, limit, offset).await?,
            Self::Favorites => FavoriteRepo::list(&state.pool, user_id, limit, offset).await?,
        };
        Ok(movies)
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /api/v1/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MyProfile>>> {
    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/me
///
/// Update the bio and/or replace the set of favorite genres.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<MyProfile>>> {
    input.validate()?;

    if let Some(ref bio) = input.bio {
        UserRepo::update_bio(&state.pool, auth.user_id, bio.trim()).await?;
    }
    if let Some(ref genre_ids) = input.favorite_genre_ids {
        UserRepo::set_favorite_genres(&state.pool, auth.user_id, genre_ids).await?;
    }
    tracing::info!(user_id = auth.user_id, "Profile updated");

    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/me/ratings
///
/// The caller's ratings, most recently changed first.
pub async fn list_my_ratings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ScoredRating<RatingWithMovie>>>>> {
    let (limit, offset) = params.clamped();
    let ratings = RatingRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    let data = ratings
        .into_iter()
        .map(ScoredRating::new)
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/me/connections
pub async fn list_connections(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ConnectedUser>>>> {
    let connections = ConnectionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: connections }))
}

// ---------------------------------------------------------------------------
// Watchlist and favorites
// ---------------------------------------------------------------------------

/// GET /api/v1/me/watchlist
pub async fn list_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ListedMovie>>>> {
    let movies = MovieList::Watchlist.list(&state, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// PUT /api/v1/me/watchlist/{movie_id}
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ListChange>>)> {
    add_to_list(&state, MovieList::Watchlist, auth.user_id, movie_id).await
}

/// DELETE /api/v1/me/watchlist/{movie_id}
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_from_list(&state, MovieList::Watchlist, auth.user_id, movie_id).await
}

/// GET /api/v1/me/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ListedMovie>>>> {
    let movies = MovieList::Favorites.list(&state, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// PUT /api/v1/me/favorites/{movie_id}
pub async fn add_to_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ListChange>>)> {
    add_to_list(&state, MovieList::Favorites, auth.user_id, movie_id).await
}

/// DELETE /api/v1/me/favorites/{movie_id}
pub async fn remove_from_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_from_list(&state, MovieList::Favorites, auth.user_id, movie_id).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_profile(state: &AppState, user_id: DbId) -> AppResult<MyProfile> {
    let user = UserRepo::find_response_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user_id))?;
    let favorite_genres = UserRepo::favorite_genres(&state.pool, user_id).await?;
    Ok(MyProfile {
        user,
        favorite_genres,
    })
}

/// Adding twice is not an error: the second call returns the existing
/// entry with 200 instead of 201.
async fn add_to_list(
    state: &AppState,
    list: MovieList,
    user_id: DbId,
    movie_id: DbId,
) -> AppResult<(StatusCode, Json<DataResponse<ListChange>>)> {
    MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", movie_id))?;

    let change = list.add(state, user_id, movie_id).await?;
    tracing::info!(user_id, movie_id, list = ?list, created = change.created, "Movie listed");

    let status = if change.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: change })))
}

async fn remove_from_list(
    state: &AppState,
    list: MovieList,
    user_id: DbId,
    movie_id: DbId,
) -> AppResult<StatusCode> {
    if !list.remove(state, user_id, movie_id).await? {
        return Err(AppError::not_found("Movie", movie_id));
    }
    tracing::info!(user_id, movie_id, list = ?list, "Movie unlisted");
    Ok(StatusCode::NO_CONTENT)
}
