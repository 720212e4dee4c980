//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- the caller if a token was sent.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireCritic`] -- requires `critic` or `admin`.

pub mod auth;
pub mod rbac;
