//! Handlers for public user profiles and connections under `/users`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::community::validate_connection;
use cinebuff_core::types::DbId;
use cinebuff_db::models::connection::Connection;
use cinebuff_db::models::user::PublicProfile;
use cinebuff_db::repositories::{ConnectionRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// A public profile as seen by the caller.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: PublicProfile,
    /// Whether the caller follows this user; always `false` when anonymous.
    pub is_connected: bool,
}

/// GET /api/v1/users/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProfileView>>> {
    let profile = UserRepo::public_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    let is_connected = match viewer.user_id() {
        Some(viewer_id) if viewer_id != id => {
            ConnectionRepo::is_connected(&state.pool, viewer_id, id).await?
        }
        _ => false,
    };

    Ok(Json(DataResponse {
        data: ProfileView {
            profile,
            is_connected,
        },
    }))
}

/// PUT /api/v1/users/{id}/connection
///
/// Follow a user. Following twice returns the existing connection with 200.
pub async fn connect(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Connection>>)> {
    validate_connection(auth.user_id, id)?;
    UserRepo::public_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    let (connection, created) = ConnectionRepo::connect(&state.pool, auth.user_id, id).await?;
    tracing::info!(from_user_id = auth.user_id, to_user_id = id, created, "Users connected");

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: connection })))
}

/// DELETE /api/v1/users/{id}/connection
pub async fn disconnect(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ConnectionRepo::disconnect(&state.pool, auth.user_id, id).await? {
        return Err(AppError::not_found("Connection", id));
    }
    tracing::info!(from_user_id = auth.user_id, to_user_id = id, "Users disconnected");
    Ok(StatusCode::NO_CONTENT)
}
