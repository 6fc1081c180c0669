//! OMDb API Data Transfer Objects
//!
//! These types match EXACTLY what the OMDb API returns.
//! DO NOT use these types outside the omdb module - convert to domain types.
//!
//! API Reference: https://www.omdbapi.com/
//!
//! Positive match (abridged):
//! ```json
//! {
//!   "Title": "Jumanji", "Year": "1995", "Runtime": "104 min",
//!   "Director": "Joe Johnston", "Plot": "When two kids find...",
//!   "imdbRating": "7.1", "imdbID": "tt0113497",
//!   "BoxOffice": "$100,475,249", "Response": "True"
//! }
//! ```
//!
//! Negative match:
//! ```json
//! { "Response": "False", "Error": "Movie not found!" }
//! ```

use serde::{Deserialize, Serialize};

/// Response for both `t=` (title) and `i=` (IMDb id) lookups
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieResponse {
    /// "True" for a positive match, "False" otherwise
    #[serde(rename = "Response")]
    pub response: String,
    /// Reason for a negative match (e.g. "Movie not found!")
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Release year; series use ranges like "2008–2013"
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "BoxOffice")]
    pub box_office: Option<String>,
}

impl MovieResponse {
    /// Whether OMDb reported a positive match.
    pub fn is_match(&self) -> bool {
        self.response == "True"
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
