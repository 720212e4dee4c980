//! Catalogue rules for movies and series.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONTENT_TYPE_MOVIE: &str = "movie";
pub const CONTENT_TYPE_SERIES: &str = "series";

/// All valid content type strings.
pub const VALID_CONTENT_TYPES: &[&str] = &[CONTENT_TYPE_MOVIE, CONTENT_TYPE_SERIES];

pub const SORT_NEWEST: &str = "newest";
pub const SORT_HIGHEST_RATED: &str = "highest_rated";
pub const SORT_LOWEST_RATED: &str = "lowest_rated";
pub const SORT_MY_RATINGS: &str = "my_ratings";

/// All valid sort keys for the movie list.
pub const VALID_SORTS: &[&str] = &[
    SORT_NEWEST,
    SORT_HIGHEST_RATED,
    SORT_LOWEST_RATED,
    SORT_MY_RATINGS,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whether a catalogue entry is a single film or a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Movie,
    Series,
}

impl ContentType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            CONTENT_TYPE_MOVIE => Ok(Self::Movie),
            CONTENT_TYPE_SERIES => Ok(Self::Series),
            _ => Err(CoreError::Validation(format!(
                "Invalid content type '{s}'. Must be one of: {}",
                VALID_CONTENT_TYPES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => CONTENT_TYPE_MOVIE,
            Self::Series => CONTENT_TYPE_SERIES,
        }
    }
}

/// Ordering applied to the movie list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovieSort {
    /// Most recently added first.
    #[default]
    Newest,
    /// Highest cached weighted average first; unrated movies last.
    HighestRated,
    /// Lowest cached weighted average first; unrated movies last.
    LowestRated,
    /// Only movies the caller has rated, newest first.
    MyRatings,
}

impl MovieSort {
    /// Parse a `?sort=` value. A missing value means [`MovieSort::Newest`].
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        match value.map(str::trim) {
            None | Some("") | Some(SORT_NEWEST) => Ok(Self::Newest),
            Some(SORT_HIGHEST_RATED) => Ok(Self::HighestRated),
            Some(SORT_LOWEST_RATED) => Ok(Self::LowestRated),
            Some(SORT_MY_RATINGS) => Ok(Self::MyRatings),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Must be one of: {}",
                VALID_SORTS.join(", ")
            ))),
        }
    }

    /// SQL `ORDER BY` clause for this sort, relative to aliases `m` (movies)
    /// and `rs` (rating_stats).
    pub fn order_by_clause(&self) -> &'static str {
        match self {
            Self::Newest | Self::MyRatings => "m.created_at DESC, m.id DESC",
            Self::HighestRated => "rs.weighted_average DESC NULLS LAST, m.id DESC",
            Self::LowestRated => "rs.weighted_average ASC NULLS LAST, m.id DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum length of a movie title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validate a movie or discussion title: non-blank and at most 200 chars.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}
