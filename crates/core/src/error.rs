//! Domain errors shared by every layer above `cinebuff-core`.

use crate::types::DbId;

/// A rule violation detected by domain logic.
///
/// The HTTP layer maps each variant to one status code, so pick the variant
/// by what the client did wrong rather than where the check lives.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The addressed entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input was well-formed but breaks a rule (score range, blank title).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request collides with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or ownership check failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Movie",
            id: 12,
        };
        assert_eq!(err.to_string(), "Movie 12 not found");
    }
}
