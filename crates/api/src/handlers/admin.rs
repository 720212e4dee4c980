//! Handlers for the `/admin` resource (admin only).

use axum::extract::{Path, Query, State};
use axum::Json;
use cinebuff_core::roles::Role;
use cinebuff_core::types::DbId;
use cinebuff_db::models::user::{SetUserRole, UserResponse};
use cinebuff_db::repositories::{RatingStatsRepo, RoleRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a statistics rebuild.
#[derive(Debug, Serialize)]
pub struct RebuildReport {
    pub movies_processed: u64,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (limit, offset) = params.clamped();
    let users = UserRepo::list_responses(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's role. Statistics of every movie the user has rated are
/// recomputed with the new weight before this returns.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetUserRole>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = Role::from_str_value(input.role.trim())?;
    let role_row = RoleRepo::find_by_name(&state.pool, role.as_str())
        .await?
        .ok_or_else(|| AppError::InternalError(format!("role '{role}' is not seeded")))?;

    UserRepo::set_role(&state.pool, id, role_row.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    let user = UserRepo::find_response_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, role = %role, admin_id = admin.user_id, "Role assigned");
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/admin/rating-stats/rebuild
///
/// Recompute the cached statistics of every movie.
pub async fn rebuild_rating_stats(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<RebuildReport>>> {
    let movies_processed = RatingStatsRepo::rebuild_all(&state.pool).await?;
    tracing::info!(movies_processed, admin_id = admin.user_id, "Rating stats rebuilt");
    Ok(Json(DataResponse {
        data: RebuildReport { movies_processed },
    }))
}
