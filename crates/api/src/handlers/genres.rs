//! Handlers for the `/genres` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::search::normalize_term;
use cinebuff_core::types::DbId;
use cinebuff_db::models::genre::{CreateGenre, Genre};
use cinebuff_db::repositories::GenreRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /genres`.
#[derive(Debug, Default, Deserialize)]
pub struct GenreListParams {
    pub search: Option<String>,
}

/// GET /api/v1/genres?search=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GenreListParams>,
) -> AppResult<Json<DataResponse<Vec<Genre>>>> {
    let genres = GenreRepo::list(&state.pool, normalize_term(params.search.as_deref())).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// GET /api/v1/genres/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Genre>>> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre", id))?;
    Ok(Json(DataResponse { data: genre }))
}

/// POST /api/v1/genres
///
/// Admin only. A duplicate name is a 409.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<DataResponse<Genre>>)> {
    input.validate()?;
    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(genre_id = genre.id, name = %genre.name, user_id = admin.user_id, "Genre created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}
