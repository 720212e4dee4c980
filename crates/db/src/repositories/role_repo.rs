//! Repository for the seeded `roles` table.

use cinebuff_core::roles::Role as RoleKind;
use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Lookups over the three seeded roles. Roles are never written at runtime.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Map a `role_id` to the domain role.
    ///
    /// `None` when the id does not exist or names a role the domain does not
    /// know about.
    pub async fn resolve(pool: &PgPool, role_id: DbId) -> Result<Option<RoleKind>, sqlx::Error> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
        Ok(name.and_then(|n| RoleKind::from_str_value(&n).ok()))
    }
}
