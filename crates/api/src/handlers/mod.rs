//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod communities;
pub mod discussions;
pub mod genres;
pub mod me;
pub mod movies;
pub mod ratings;
pub mod reviews;
pub mod users;
