//! Repository for the `genres` table.

use cinebuff_core::search::contains_pattern;
use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::{CreateGenre, Genre};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// Insert a new genre. A duplicate name fails with `uq_genres_name`.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!(
            "INSERT INTO genres (name, description)
             VALUES ($1, COALESCE($2, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(input.name.trim())
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find a genre by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE id = $1");
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List genres alphabetically, optionally filtered by a name fragment.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM genres
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY name"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(search.map(contains_pattern))
            .fetch_all(pool)
            .await
    }

    /// Genres of a movie, alphabetical.
    pub async fn list_for_movie(pool: &PgPool, movie_id: DbId) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.description, g.created_at
             FROM movie_genres mg
             JOIN genres g ON g.id = mg.genre_id
             WHERE mg.movie_id = $1
             ORDER BY g.name",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }
}
