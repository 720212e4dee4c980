//! Domain logic for the cinebuff movie-rating service.
//!
//! Nothing in this crate touches the database. Repositories load rows and
//! hand plain values to the functions here.

pub mod community;
pub mod error;
pub mod movie;
pub mod rating;
pub mod rating_stats;
pub mod roles;
pub mod search;
pub mod types;
