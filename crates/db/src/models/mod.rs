//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs, with field constraints declared via
//!   `validator`

pub mod community;
pub mod connection;
pub mod discussion;
pub mod genre;
pub mod movie;
pub mod rating;
pub mod rating_stats;
pub mod review;
pub mod role;
pub mod session;
pub mod user;
pub mod watchlist;
