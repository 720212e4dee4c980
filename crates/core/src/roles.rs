//! Account roles and the privileges attached to them.
//!
//! The string constants must match the seed data in
//! `20260301000001_create_roles_and_users.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_CRITIC: &str = "critic";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_CRITIC, ROLE_ADMIN];

/// Weight applied to a critic's rating in the weighted average.
pub const CRITIC_WEIGHT: f64 = 2.0;

/// Weight applied to every non-critic rating.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// The role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Critic,
    Admin,
}

impl Role {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_USER => Ok(Self::User),
            ROLE_CRITIC => Ok(Self::Critic),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Critic => ROLE_CRITIC,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Weight of a rating authored by this role.
    ///
    /// Only critics are weighted up; admins count the same as users.
    pub fn rating_weight(&self) -> f64 {
        match self {
            Self::Critic => CRITIC_WEIGHT,
            Self::User | Self::Admin => DEFAULT_WEIGHT,
        }
    }

    /// Whether this role may add movies to the catalogue.
    pub fn can_add_movies(&self) -> bool {
        matches!(self, Self::Critic | Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
