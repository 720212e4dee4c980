//! Handlers for the `/communities` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::community::{ensure_member, validate_content};
use cinebuff_core::movie::validate_title;
use cinebuff_core::search::DEFAULT_PAGE_SIZE;
use cinebuff_core::types::DbId;
use cinebuff_db::models::community::{
    Community, CommunityWithStats, CreateCommunity, MemberWithUser,
};
use cinebuff_db::models::discussion::{CreatePost, DiscussionPost, PostWithAuthor};
use cinebuff_db::models::movie::MovieListItem;
use cinebuff_db::repositories::{CommunityRepo, DiscussionRepo, GenreRepo, MovieRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A community page: the community, recent movies of its genre and members.
#[derive(Debug, Serialize)]
pub struct CommunityDetail {
    #[serde(flatten)]
    pub community: CommunityWithStats,
    pub movies: Vec<MovieListItem>,
    pub members: Vec<MemberWithUser>,
}

/// Outcome of `PUT /communities/{id}/membership`.
#[derive(Debug, Serialize)]
pub struct JoinResult {
    /// `false` when the caller was already a member.
    pub joined: bool,
}

/// GET /api/v1/communities
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<CommunityWithStats>>>> {
    let communities = CommunityRepo::list_with_stats(&state.pool, viewer.user_id()).await?;
    Ok(Json(DataResponse { data: communities }))
}

/// POST /api/v1/communities
///
/// Admin only. The name defaults to the genre's name; a genre has at most
/// one community.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateCommunity>,
) -> AppResult<(StatusCode, Json<DataResponse<Community>>)> {
    input.validate()?;
    let genre = GenreRepo::find_by_id(&state.pool, input.genre_id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre", input.genre_id))?;

    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(genre.name.as_str());
    let description = input.description.as_deref().unwrap_or_default();

    let community = CommunityRepo::create(&state.pool, genre.id, name, description).await?;
    tracing::info!(
        community_id = community.id,
        genre_id = genre.id,
        admin_id = admin.user_id,
        "Community created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: community })))
}

/// GET /api/v1/communities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommunityDetail>>> {
    let community = CommunityRepo::find_with_stats(&state.pool, id, viewer.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("Community", id))?;
    let movies =
        MovieRepo::list_for_genre(&state.pool, community.genre_id, DEFAULT_PAGE_SIZE).await?;
    let members = CommunityRepo::list_members(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: CommunityDetail {
            community,
            movies,
            members,
        },
    }))
}

/// PUT /api/v1/communities/{id}/membership
///
/// Join a community. Joining twice is not an error.
pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<JoinResult>>> {
    find_community(&state, id).await?;
    let joined = CommunityRepo::join(&state.pool, id, auth.user_id).await?;
    tracing::info!(community_id = id, user_id = auth.user_id, joined, "Community joined");
    Ok(Json(DataResponse {
        data: JoinResult { joined },
    }))
}

/// DELETE /api/v1/communities/{id}/membership
pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_community(&state, id).await?;
    if !CommunityRepo::leave(&state.pool, id, auth.user_id).await? {
        return Err(AppError::not_found("Membership", id));
    }
    tracing::info!(community_id = id, user_id = auth.user_id, "Community left");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/communities/{id}/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<PostWithAuthor>>>> {
    find_community(&state, id).await?;
    let (limit, offset) = params.clamped();
    let posts = DiscussionRepo::list_posts(&state.pool, id, limit, offset).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/communities/{id}/posts
///
/// Members only.
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<DataResponse<DiscussionPost>>)> {
    input.validate()?;
    validate_title(&input.title)?;
    validate_content(&input.content)?;

    let community = find_community(&state, id).await?;
    let is_member = CommunityRepo::is_member(&state.pool, id, auth.user_id).await?;
    ensure_member(is_member, &community.name)?;

    let post = DiscussionRepo::create_post(&state.pool, id, auth.user_id, &input).await?;
    tracing::info!(post_id = post.id, community_id = id, user_id = auth.user_id, "Post created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

pub(crate) async fn find_community(state: &AppState, id: DbId) -> AppResult<Community> {
    CommunityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Community", id))
}
