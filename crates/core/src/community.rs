//! Social rules: connections between users and genre communities.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Maximum length of a discussion comment or post body.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Reject a connection from a user to themselves.
pub fn validate_connection(from_user_id: DbId, to_user_id: DbId) -> Result<(), CoreError> {
    if from_user_id == to_user_id {
        return Err(CoreError::Validation(
            "You cannot connect with yourself".into(),
        ));
    }
    Ok(())
}

/// Validate the body of a post or comment: non-blank and bounded.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Only community members may start discussions or comment on them.
pub fn ensure_member(is_member: bool, community_name: &str) -> Result<(), CoreError> {
    if !is_member {
        return Err(CoreError::Forbidden(format!(
            "Join the {community_name} community to take part in its discussions"
        )));
    }
    Ok(())
}

/// Authors may delete their own content; admins may delete anything.
pub fn can_delete(author_id: DbId, user_id: DbId, role: Role) -> bool {
    author_id == user_id || role == Role::Admin
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn cannot_connect_to_self() {
        assert_matches!(validate_connection(3, 3), Err(CoreError::Validation(_)));
        assert!(validate_connection(3, 4).is_ok());
    }

    #[test]
    fn content_must_not_be_blank() {
        assert!(validate_content("Best noir of the decade?").is_ok());
        assert!(validate_content(" \n ").is_err());
        assert!(validate_content(&"a".repeat(MAX_CONTENT_LENGTH + 1)).is_err());
    }

    #[test]
    fn non_members_are_forbidden() {
        assert!(ensure_member(true, "Horror").is_ok());
        assert_matches!(
            ensure_member(false, "Horror"),
            Err(CoreError::Forbidden(msg)) if msg.contains("Horror")
        );
    }

    #[test]
    fn delete_permissions() {
        assert!(can_delete(1, 1, Role::User));
        assert!(!can_delete(1, 2, Role::Critic));
        assert!(can_delete(1, 2, Role::Admin));
    }
}
