//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data access
//! methods that accept `&PgPool` as the first argument. The exception is
//! [`RatingStatsRepo::recompute`], which takes a connection so it can run
//! inside the caller's transaction.

pub mod community_repo;
pub mod connection_repo;
pub mod discussion_repo;
pub mod genre_repo;
pub mod movie_list_repo;
pub mod movie_repo;
pub mod rating_repo;
pub mod rating_stats_repo;
pub mod review_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use community_repo::CommunityRepo;
pub use connection_repo::ConnectionRepo;
pub use discussion_repo::DiscussionRepo;
pub use genre_repo::GenreRepo;
pub use movie_list_repo::{FavoriteRepo, WatchlistRepo};
pub use movie_repo::MovieRepo;
pub use rating_repo::RatingRepo;
pub use rating_stats_repo::RatingStatsRepo;
pub use review_repo::ReviewRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
