//! Repository for the `movies` table and its genre links.

use cinebuff_core::movie::MovieSort;
use cinebuff_core::search::contains_pattern;
use cinebuff_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie, MovieFilter, MovieListItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, synopsis, release_date, poster_url, content_type, \
                        created_by, created_at, updated_at";

/// Select list for [`MovieListItem`], relative to aliases `m` and `rs`.
const LIST_COLUMNS: &str = "\
    m.id, m.title, m.synopsis, m.release_date, m.poster_url, m.content_type, \
    m.created_by, m.created_at, m.updated_at, \
    ARRAY(SELECT g.name FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
          WHERE mg.movie_id = m.id ORDER BY g.name) AS genres, \
    rs.weighted_average, \
    COALESCE(rs.total_ratings, 0) AS total_ratings";

/// Provides CRUD and search operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie and link its genres in one transaction.
    ///
    /// An unknown genre id fails with a foreign key violation and nothing is
    /// written.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMovie,
        content_type: &str,
        created_by: DbId,
    ) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movies (title, synopsis, release_date, poster_url, content_type, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(input.title.trim())
            .bind(&input.synopsis)
            .bind(input.release_date)
            .bind(input.poster_url.as_deref())
            .bind(content_type)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        if !input.genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id)
                 SELECT $1, g FROM UNNEST($2::bigint[]) AS g
                 ON CONFLICT DO NOTHING",
            )
            .bind(movie.id)
            .bind(&input.genre_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(movie)
    }

    /// Find a movie by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List movies matching `filter`, in the filter's sort order.
    ///
    /// [`MovieSort::MyRatings`] without a caller yields an empty page.
    pub async fn list(
        pool: &PgPool,
        filter: &MovieFilter,
    ) -> Result<Vec<MovieListItem>, sqlx::Error> {
        if filter.sort == MovieSort::MyRatings && filter.user_id.is_none() {
            return Ok(Vec::new());
        }

        let (where_clause, bind_idx) = where_clause(filter);
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM movies m
             LEFT JOIN rating_stats rs ON rs.movie_id = m.id
             {where_clause}
             ORDER BY {order_by}
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            order_by = filter.sort.order_by_clause(),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, MovieListItem>(&query);
        if let Some(ref search) = filter.search {
            q = q.bind(contains_pattern(search));
        }
        if let Some(ref genre) = filter.genre {
            q = q.bind(genre);
        }
        if filter.sort == MovieSort::MyRatings {
            q = q.bind(filter.user_id);
        }
        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    /// Count movies matching `filter`, ignoring its pagination.
    pub async fn count(pool: &PgPool, filter: &MovieFilter) -> Result<i64, sqlx::Error> {
        if filter.sort == MovieSort::MyRatings && filter.user_id.is_none() {
            return Ok(0);
        }

        let (where_clause, _) = where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM movies m {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(ref search) = filter.search {
            q = q.bind(contains_pattern(search));
        }
        if let Some(ref genre) = filter.genre {
            q = q.bind(genre);
        }
        if filter.sort == MovieSort::MyRatings {
            q = q.bind(filter.user_id);
        }
        q.fetch_one(pool).await
    }

    /// Movies tagged with a genre, newest first.
    pub async fn list_for_genre(
        pool: &PgPool,
        genre_id: DbId,
        limit: i64,
    ) -> Result<Vec<MovieListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM movies m
             JOIN movie_genres link ON link.movie_id = m.id AND link.genre_id = $1
             LEFT JOIN rating_stats rs ON rs.movie_id = m.id
             ORDER BY m.created_at DESC, m.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, MovieListItem>(&query)
            .bind(genre_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// Build the `WHERE` clause for a movie filter.
///
/// Returns the clause and the next free bind index. Binds must be applied in
/// the order: search, genre, caller id.
fn where_clause(filter: &MovieFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.search.is_some() {
        conditions.push(format!(
            "(m.title ILIKE ${bind_idx} OR m.synopsis ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }
    if filter.genre.is_some() {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = m.id AND g.name = ${bind_idx})"
        ));
        bind_idx += 1;
    }
    if filter.sort == MovieSort::MyRatings {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM ratings r WHERE r.movie_id = m.id AND r.user_id = ${bind_idx})"
        ));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, next) = where_clause(&MovieFilter::default());
        assert!(clause.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn binds_are_numbered_in_order() {
        let filter = MovieFilter {
            search: Some("heat".into()),
            genre: Some("Crime".into()),
            sort: MovieSort::MyRatings,
            user_id: Some(7),
            ..Default::default()
        };
        let (clause, next) = where_clause(&filter);
        assert!(clause.contains("m.title ILIKE $1"));
        assert!(clause.contains("g.name = $2"));
        assert!(clause.contains("r.user_id = $3"));
        assert_eq!(next, 4);
    }
}
