//! Response envelopes.
//!
//! Successful API bodies are `{ "data": ... }`; listings put a [`Page`]
//! inside that envelope. Auth token responses are the one exception and are
//! returned bare.

use serde::Serialize;

/// `{ "data": T }`. A `None` payload serializes as `"data": null`, which is
/// how an unrated movie's stats are reported.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    /// Total number of matching rows across all pages.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
