//! Handlers for the `/movies` resource and its per-movie sub-resources
//! (ratings, statistics, reviews).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::movie::{validate_title, ContentType, MovieSort};
use cinebuff_core::search::{
    clamp_limit, clamp_offset, normalize_term, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use cinebuff_core::types::DbId;
use cinebuff_db::models::genre::Genre;
use cinebuff_db::models::movie::{CreateMovie, Movie, MovieFilter, MovieListItem};
use cinebuff_db::models::rating::{RateMovie, Rating, RatingWithAuthor};
use cinebuff_db::models::rating_stats::RatingStats;
use cinebuff_db::models::review::{Review, ReviewWithAuthor, UpsertReview};
use cinebuff_db::repositories::{
    FavoriteRepo, GenreRepo, MovieRepo, RatingRepo, RatingStatsRepo, ReviewRepo, WatchlistRepo,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::ratings::{RatingChangeResponse, ScoredRating};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireCritic;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Number of reviews embedded in a movie detail response.
const DETAIL_REVIEW_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /movies`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Full movie page.
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    /// `null` when nobody has rated the movie yet.
    pub stats: Option<RatingStats>,
    pub reviews: Vec<ReviewWithAuthor>,
    /// Present only for authenticated callers.
    pub viewer: Option<ViewerState>,
}

/// What the caller has done with a movie.
#[derive(Debug, Serialize)]
pub struct ViewerState {
    pub rating: Option<ScoredRating<Rating>>,
    pub review: Option<Review>,
    pub in_watchlist: bool,
    pub is_favorite: bool,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// GET /api/v1/movies?search=&genre=&sort=&limit=&offset=
///
/// `sort=my_ratings` lists the caller's rated movies and is empty for
/// anonymous callers.
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<MovieListParams>,
) -> AppResult<Json<DataResponse<Page<MovieListItem>>>> {
    let sort = MovieSort::parse(params.sort.as_deref())?;
    let filter = MovieFilter {
        search: normalize_term(params.search.as_deref()).map(str::to_string),
        genre: normalize_term(params.genre.as_deref()).map(str::to_string),
        sort,
        user_id: viewer.user_id(),
        limit: clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(params.offset),
    };

    let items = MovieRepo::list(&state.pool, &filter).await?;
    let total = MovieRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        },
    }))
}

/// POST /api/v1/movies
///
/// Critics and admins only.
pub async fn create(
    State(state): State<AppState>,
    RequireCritic(auth): RequireCritic,
    Json(input): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<DataResponse<Movie>>)> {
    input.validate()?;
    validate_title(&input.title)?;
    let content_type = match input.content_type.as_deref() {
        Some(value) => ContentType::from_str_value(value)?,
        None => ContentType::default(),
    };

    let movie = MovieRepo::create(&state.pool, &input, content_type.as_str(), auth.user_id).await?;

    tracing::info!(
        movie_id = movie.id,
        user_id = auth.user_id,
        title = %movie.title,
        "Movie created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: movie })))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MovieDetail>>> {
    let movie = find_movie(&state, id).await?;
    let genres = GenreRepo::list_for_movie(&state.pool, id).await?;
    let stats = RatingStatsRepo::find_by_movie(&state.pool, id).await?;
    let reviews = ReviewRepo::list(&state.pool, Some(id), None, DETAIL_REVIEW_LIMIT, 0).await?;

    let viewer = match viewer.user_id() {
        Some(user_id) => Some(ViewerState {
            rating: RatingRepo::find_for_user_and_movie(&state.pool, user_id, id)
                .await?
                .map(ScoredRating::new),
            review: ReviewRepo::find_for_user_and_movie(&state.pool, user_id, id).await?,
            in_watchlist: WatchlistRepo::contains(&state.pool, user_id, id).await?,
            is_favorite: FavoriteRepo::contains(&state.pool, user_id, id).await?,
        }),
        None => None,
    };

    Ok(Json(DataResponse {
        data: MovieDetail {
            movie,
            genres,
            stats,
            reviews,
            viewer,
        },
    }))
}

// ---------------------------------------------------------------------------
// Ratings and statistics
// ---------------------------------------------------------------------------

/// GET /api/v1/movies/{id}/ratings
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ScoredRating<RatingWithAuthor>>>>> {
    find_movie(&state, id).await?;
    let (limit, offset) = params.clamped();

    let ratings = RatingRepo::list_for_movie(&state.pool, id, limit, offset).await?;
    let data = ratings
        .into_iter()
        .map(ScoredRating::new)
        .collect();

    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/movies/{id}/rating
///
/// Create or replace the caller's rating of this movie. Returns 201 when a
/// new rating was created and 200 when an existing one was replaced.
pub async fn put_my_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RateMovie>,
) -> AppResult<(StatusCode, Json<DataResponse<RatingChangeResponse>>)> {
    input.validate()?;

    let (change, created) = RatingRepo::upsert_for_user(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    tracing::info!(
        rating_id = change.rating.id,
        movie_id = id,
        user_id = auth.user_id,
        created,
        "Rating saved"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: change.into() })))
}

/// DELETE /api/v1/movies/{id}/rating
pub async fn delete_my_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let rating = RatingRepo::find_for_user_and_movie(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", id))?;

    let change = RatingRepo::delete(&state.pool, rating.id)
        .await?
        .ok_or_else(|| AppError::not_found("Rating", rating.id))?;

    tracing::info!(
        rating_id = rating.id,
        movie_id = id,
        user_id = auth.user_id,
        stats_removed = change.stats.is_none(),
        "Rating deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/movies/{id}/stats
///
/// `data` is `null` for a movie nobody has rated.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<RatingStats>>>> {
    find_movie(&state, id).await?;
    let stats = RatingStatsRepo::find_by_movie(&state.pool, id).await?;
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// GET /api/v1/movies/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ReviewWithAuthor>>>> {
    find_movie(&state, id).await?;
    let (limit, offset) = params.clamped();
    let reviews = ReviewRepo::list(&state.pool, Some(id), None, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// PUT /api/v1/movies/{id}/review
///
/// Write or rewrite the caller's review of this movie.
pub async fn put_my_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpsertReview>,
) -> AppResult<Json<DataResponse<Review>>> {
    input.validate()?;
    validate_title(&input.title)?;
    find_movie(&state, id).await?;

    let review = ReviewRepo::upsert(&state.pool, auth.user_id, id, &input).await?;
    tracing::info!(review_id = review.id, movie_id = id, user_id = auth.user_id, "Review saved");

    Ok(Json(DataResponse { data: review }))
}

async fn find_movie(state: &AppState, id: DbId) -> AppResult<Movie> {
    MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))
}
