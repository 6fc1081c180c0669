//! Test utilities and fixtures for movie-minder tests.
//!
//! This module provides common test helpers, mock factories, and
//! database utilities to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use movie_minder::test_utils::{temp_db, mock_catalog};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (pool, _dir) = temp_db().await;
//!     let records = mock_catalog();
//!     // ... test logic
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, TimeZone};
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::enrichment::{EnrichmentConfig, MissingRecordEntry};
use crate::model::{CatalogRecord, RatingEvent};
use crate::source::SourcePaths;

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_url = crate::db::db_url(Some(&dir.path().join("test.db")));

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Three MovieLens-style records: two with a year, one without.
pub fn mock_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::new(
            1,
            "Toy Story (1995)",
            "Adventure|Animation|Children|Comedy|Fantasy",
        ),
        CatalogRecord::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
        CatalogRecord::new(
            30,
            "Shanghai Triad (Yao a yao yao dao waipo qiao)",
            "Crime|Drama",
        ),
    ]
}

pub fn mock_ratings() -> Vec<RatingEvent> {
    vec![
        RatingEvent {
            user_id: 1,
            movie_id: 1,
            rating: 4.0,
            timestamp: Some(964982703),
        },
        RatingEvent {
            user_id: 1,
            movie_id: 2,
            rating: 3.5,
            timestamp: Some(964981247),
        },
        RatingEvent {
            user_id: 2,
            movie_id: 30,
            rating: 5.0,
            timestamp: None,
        },
    ]
}

/// A missing-movie entry with sensible defaults.
///
/// Use struct update syntax to customize:
///
/// ```ignore
/// let entry = MissingRecordEntry {
///     release_year: None,
///     ..mock_missing_entry(1, None)
/// };
/// ```
pub fn mock_missing_entry(movie_id: i64, imdb_id: Option<&str>) -> MissingRecordEntry {
    MissingRecordEntry {
        movie_id,
        original_title: format!("Test Movie {} (1999)", movie_id),
        normalized_title: format!("Test Movie {}", movie_id),
        release_year: Some(1999),
        genres: vec!["Drama".to_string()],
        imdb_id: imdb_id.map(String::from),
        strategies_attempted: "Title+Year,Title Only".to_string(),
        error_reason: "Not found in OMDb API".to_string(),
        timestamp: Local
            .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp"),
    }
}

/// Enrichment settings with no pauses, for fast tests.
pub fn instant_config(request_limit: Option<usize>) -> EnrichmentConfig {
    EnrichmentConfig {
        call_delay: Duration::ZERO,
        retry_delay: Duration::ZERO,
        request_limit,
    }
}

/// Writes movies, ratings and links CSVs matching `mock_catalog()`.
///
/// The ratings file has one non-numeric row that the extractor drops.
/// Movie 1 maps to tt0114709, movie 30 to an id no mock knows about and
/// movie 2 has no IMDb id.
pub fn write_sources(dir: &Path) -> SourcePaths {
    let movies = write_file(
        dir,
        "movies.csv",
        "movieId,title,genres\n\
         1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
         2,Jumanji (1995),Adventure|Children|Fantasy\n\
         30,Shanghai Triad (Yao a yao yao dao waipo qiao),Crime|Drama\n",
    );
    let ratings = write_file(
        dir,
        "ratings.csv",
        "userId,movieId,rating,timestamp\n\
         1,1,4.0,964982703\n\
         1,2,3.5,964981247\n\
         2,30,not-a-rating,964980000\n\
         2,30,5.0,964983815\n",
    );
    let links = write_file(
        dir,
        "links.csv",
        "movieId,imdbId,tmdbId\n\
         1,0114709,862\n\
         2,,8844\n\
         30,0115012,\n",
    );

    SourcePaths {
        movies,
        ratings,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_db_creates_valid_pool() {
        let (pool, _dir) = temp_db().await;
        let movies = crate::db::get_all_movies(&pool).await.unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn test_mock_catalog_has_yearless_record() {
        let records = mock_catalog();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].release_year, Some(1995));
        assert_eq!(records[2].release_year, None);
    }

    #[test]
    fn test_write_sources_matches_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_sources(dir.path());
        let data = crate::source::load(&paths).unwrap();

        assert_eq!(data.catalog, mock_catalog());
        assert_eq!(data.ratings.len(), 3);
        assert_eq!(data.dropped_ratings, 1);
        assert_eq!(data.mapping.get(1), Some(114709));
        assert_eq!(data.mapping.get(2), None);
    }
}
