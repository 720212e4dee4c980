//! Handlers for discussion posts and comments.
//!
//! Posts are created under `/communities/{id}/posts`; once they exist they
//! are addressed directly by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinebuff_core::community::{can_delete, ensure_member, validate_content};
use cinebuff_core::types::DbId;
use cinebuff_db::models::discussion::{
    CommentWithAuthor, CreateComment, DiscussionComment, DiscussionPost, PostWithAuthor,
};
use cinebuff_db::repositories::{CommunityRepo, DiscussionRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::communities::find_community;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A post with its comments, oldest comment first.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostWithAuthor,
    pub comments: Vec<CommentWithAuthor>,
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostDetail>>> {
    let post = DiscussionRepo::find_post_with_author(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;
    let comments = DiscussionRepo::list_comments(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: PostDetail { post, comments },
    }))
}

/// DELETE /api/v1/posts/{id}
///
/// Authors may delete their own posts; admins may delete any.
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let post = find_post(&state, id).await?;
    if !can_delete(post.author_id, auth.user_id, auth.role) {
        return Err(AppError::forbidden("You can only delete your own posts"));
    }
    if !DiscussionRepo::delete_post(&state.pool, id).await? {
        return Err(AppError::not_found("Post", id));
    }
    tracing::info!(post_id = id, community_id = post.community_id, user_id = auth.user_id, "Post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts/{id}/comments
///
/// Members of the post's community only.
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<DiscussionComment>>)> {
    input.validate()?;
    validate_content(&input.content)?;

    let post = find_post(&state, id).await?;
    let community = find_community(&state, post.community_id).await?;
    let is_member = CommunityRepo::is_member(&state.pool, community.id, auth.user_id).await?;
    ensure_member(is_member, &community.name)?;

    let comment = DiscussionRepo::create_comment(&state.pool, id, auth.user_id, &input).await?;
    tracing::info!(comment_id = comment.id, post_id = id, user_id = auth.user_id, "Comment created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = DiscussionRepo::find_comment_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", id))?;
    if !can_delete(comment.author_id, auth.user_id, auth.role) {
        return Err(AppError::forbidden("You can only delete your own comments"));
    }
    if !DiscussionRepo::delete_comment(&state.pool, id).await? {
        return Err(AppError::not_found("Comment", id));
    }
    tracing::info!(comment_id = id, post_id = comment.post_id, user_id = auth.user_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_post(state: &AppState, id: DbId) -> AppResult<DiscussionPost> {
    DiscussionRepo::find_post_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))
}
