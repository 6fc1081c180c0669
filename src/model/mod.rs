//! Core data models for the movie catalog.
//!
//! Defines the primary entities: [`CatalogRecord`], [`RatingEvent`] and
//! the persisted row shapes read back from SQLx.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `movies` - One row per catalog record, including enrichment fields
//! - `genres` - Genre vocabulary with unique names
//! - `movie_genres` - Membership edges between movies and genres
//! - `ratings` - Individual rating events

use sqlx::FromRow;

use crate::catalog::title;
use crate::enrichment::MovieDetails;

/// Metadata fetched from the external source for one catalog record.
///
/// Every field stays `None` until a strategy produces a positive match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    /// IMDb identifier (e.g. "tt0114709")
    pub imdb_id: Option<String>,
    pub director: Option<String>,
    /// Synopsis
    pub plot: Option<String>,
    /// Box office figure as reported (e.g. "$191,796,233")
    pub box_office: Option<String>,
    /// IMDb rating, coerced from the reported string
    pub imdb_rating: Option<f64>,
    /// Runtime as reported (e.g. "81 min")
    pub runtime: Option<String>,
}

impl From<MovieDetails> for Enrichment {
    fn from(details: MovieDetails) -> Self {
        Self {
            imdb_rating: details.coerced_rating(),
            imdb_id: details.imdb_id,
            director: details.director,
            plot: details.plot,
            box_office: details.box_office,
            runtime: details.runtime,
        }
    }
}

/// A movie from the local catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// Internal id (MovieLens `movieId`)
    pub movie_id: i64,
    /// Title exactly as supplied by the source
    pub raw_title: String,
    /// Year split out of the raw title
    pub release_year: Option<i32>,
    /// Raw title with the trailing year removed
    pub clean_title: String,
    /// Genre tags in source order, without duplicates
    pub genres: Vec<String>,
    pub enrichment: Enrichment,
}

impl CatalogRecord {
    /// Build a record from a source row, deriving year and clean title.
    pub fn new(movie_id: i64, raw_title: impl Into<String>, genres: &str) -> Self {
        let raw_title = raw_title.into();
        let (release_year, clean_title) = title::extract_year(&raw_title);
        Self {
            movie_id,
            release_year,
            clean_title,
            raw_title,
            genres: parse_genres(genres),
            enrichment: Enrichment::default(),
        }
    }

    /// Whether a strategy has populated the enrichment fields.
    pub fn is_enriched(&self) -> bool {
        self.enrichment != Enrichment::default()
    }
}

/// Split a `|`-delimited genre string into distinct, trimmed tags.
pub fn parse_genres(genres: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in genres.split('|').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// A single user rating for a movie.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RatingEvent {
    pub user_id: i64,
    pub movie_id: i64,
    /// Star rating (0.5 - 5.0 in MovieLens)
    pub rating: f64,
    /// Unix timestamp of the rating
    pub timestamp: Option<i64>,
}

/// A persisted movie row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieRow {
    pub movie_id: i64,
    pub title: String,
    pub release_year: Option<i64>,
    pub imdb_id: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
    pub imdb_rating: Option<f64>,
    pub runtime: Option<String>,
}

/// A genre in the persisted vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_derives_year_and_clean_title() {
        let record = CatalogRecord::new(1, "Toy Story (1995)", "Adventure|Animation|Children");
        assert_eq!(record.release_year, Some(1995));
        assert_eq!(record.clean_title, "Toy Story");
        assert_eq!(record.raw_title, "Toy Story (1995)");
        assert_eq!(record.genres, vec!["Adventure", "Animation", "Children"]);
        assert!(!record.is_enriched());
    }

    #[test]
    fn test_parse_genres_drops_blanks_and_duplicates() {
        assert_eq!(parse_genres("Drama| |Drama|Comedy"), vec!["Drama", "Comedy"]);
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_enrichment_from_details_coerces_rating() {
        let details = MovieDetails {
            imdb_id: Some("tt0113497".to_string()),
            imdb_rating: Some("N/A".to_string()),
            ..Default::default()
        };
        let enrichment = Enrichment::from(details);
        assert_eq!(enrichment.imdb_id.as_deref(), Some("tt0113497"));
        assert_eq!(enrichment.imdb_rating, None);
    }
}
