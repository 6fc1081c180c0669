//! Source reader for the MovieLens CSV files.
//!
//! Three inputs feed a run:
//! - `movies.csv` (`movieId,title,genres`) - required
//! - `ratings.csv` (`userId,movieId,rating,timestamp`) - required
//! - `links.csv` (`movieId,imdbId,tmdbId`) - optional; without it the
//!   IMDb ID fallback strategy is simply never available
//!
//! Missing required files surface as [`Error::SourceUnavailable`] so the
//! run can abort before any enrichment or database work starts.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::enrichment::IdentifierMapping;
use crate::error::{Error, Result, ResultExt};
use crate::model::{CatalogRecord, RatingEvent};

/// Locations of the three input files.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub movies: PathBuf,
    pub ratings: PathBuf,
    pub links: PathBuf,
}

/// Everything extracted from the sources for one run.
#[derive(Debug, Default)]
pub struct SourceData {
    pub catalog: Vec<CatalogRecord>,
    pub ratings: Vec<RatingEvent>,
    pub mapping: IdentifierMapping,
    /// Rating rows dropped because a required column was not numeric
    pub dropped_ratings: usize,
}

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: i64,
    title: String,
    #[serde(default)]
    genres: String,
}

/// Rating rows are read as text so bad values can be dropped per row.
#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "movieId")]
    movie_id: String,
    rating: String,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    #[serde(rename = "movieId")]
    movie_id: i64,
    #[serde(rename = "imdbId", default, deserialize_with = "csv::invalid_option")]
    imdb_id: Option<i64>,
}

/// Read all three sources.
///
/// Fails on a missing or unreadable catalog/ratings file. A missing links
/// file only logs a warning and yields an empty mapping.
pub fn load(paths: &SourcePaths) -> Result<SourceData> {
    tracing::info!("Extracting data from CSV files...");

    let catalog = read_catalog(&paths.movies)?;
    let (ratings, dropped_ratings) = read_ratings(&paths.ratings)?;

    let mapping = match read_links(&paths.links) {
        Ok(mapping) => {
            tracing::info!(
                "Loaded {} IMDb ID mappings from {}",
                mapping.len(),
                paths.links.display()
            );
            mapping
        }
        Err(e) if e.is_source_unavailable() => {
            tracing::warn!(
                "{} not found. IMDb ID fallback will not be available.",
                paths.links.display()
            );
            IdentifierMapping::default()
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        "Loaded {} movies and {} ratings",
        catalog.len(),
        ratings.len()
    );

    Ok(SourceData {
        catalog,
        ratings,
        mapping,
        dropped_ratings,
    })
}

/// Read catalog rows, deriving year and clean title for each.
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogRecord>> {
    let mut reader = open(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize::<MovieRow>() {
        let row = row.with_context(format!("reading {}", path.display()))?;
        records.push(CatalogRecord::new(row.movie_id, row.title, &row.genres));
    }

    Ok(records)
}

/// Read rating rows, dropping any whose ids or rating are not numeric.
///
/// Returns the kept events and the number of dropped rows.
pub fn read_ratings(path: &Path) -> Result<(Vec<RatingEvent>, usize)> {
    let mut reader = open(path)?;
    let mut events = Vec::new();
    let mut dropped = 0;

    for row in reader.deserialize::<RatingRow>() {
        let row = row.with_context(format!("reading {}", path.display()))?;
        match to_rating_event(&row) {
            Some(event) => events.push(event),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::info!("Removed {} invalid ratings", dropped);
    }

    Ok((events, dropped))
}

/// Read the movieId → imdbId side table.
pub fn read_links(path: &Path) -> Result<IdentifierMapping> {
    let mut reader = open(path)?;
    let mut mapping = IdentifierMapping::default();

    for row in reader.deserialize::<LinkRow>() {
        let row = row.with_context(format!("reading {}", path.display()))?;
        mapping.insert(row.movie_id, row.imdb_id);
    }

    Ok(mapping)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        tracing::error!("CSV file not found: {}", path.display());
        return Err(Error::source_unavailable(path));
    }
    csv::Reader::from_path(path).with_context(format!("opening {}", path.display()))
}

fn to_rating_event(row: &RatingRow) -> Option<RatingEvent> {
    let user_id = parse_id(&row.user_id)?;
    let movie_id = parse_id(&row.movie_id)?;
    let rating = row.rating.trim().parse::<f64>().ok().filter(|r| r.is_finite())?;
    let timestamp = row.timestamp.as_deref().and_then(parse_id);

    Some(RatingEvent {
        user_id,
        movie_id,
        rating,
        timestamp,
    })
}

/// Parse an integer column, accepting float spellings such as "12.0".
fn parse_id(value: &str) -> Option<i64> {
    let value = value.trim();
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
