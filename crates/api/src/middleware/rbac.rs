//! Role gates layered on top of [`AuthUser`].
//!
//! Ownership checks (own rating, own review) live in the handlers; these
//! extractors only look at the role carried by the token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cinebuff_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then reject with 403 unless `allowed` accepts the role.
async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&Role) -> bool,
    denied: &'static str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed(&user.role) {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role gate denied request");
        return Err(AppError::forbidden(denied));
    }
    Ok(user)
}

/// Admin-only routes: genre and community creation, role management,
/// stats rebuilds.
///
/// ```ignore
/// async fn rebuild(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, |r| *r == Role::Admin, "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Routes that grow the catalogue. Critics and admins pass.
pub struct RequireCritic(pub AuthUser);

impl FromRequestParts<AppState> for RequireCritic {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(
            parts,
            state,
            Role::can_add_movies,
            "Critic or Admin role required",
        )
        .await
        .map(RequireCritic)
    }
}
