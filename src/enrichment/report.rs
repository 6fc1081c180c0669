//! Missing-movie bookkeeping.
//!
//! Every record whose strategy chain ends without a match is appended here
//! with enough context to diagnose it later. At the end of the transform
//! phase the collection is flushed to a CSV report and drained.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{Result, ResultExt};

/// Placeholder written for absent report values.
const NOT_AVAILABLE: &str = "N/A";

/// A record no strategy could match.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingRecordEntry {
    pub movie_id: i64,
    pub original_title: String,
    pub normalized_title: String,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
    /// IMDb id from the links table, if one was available
    pub imdb_id: Option<String>,
    /// Strategies attempted, comma-joined
    pub strategies_attempted: String,
    pub error_reason: String,
    pub timestamp: DateTime<Local>,
}

/// Counts returned by [`EnrichmentReporter::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingSummary {
    pub total: usize,
    /// Missing even though an IMDb id was available
    pub with_imdb_id: usize,
    pub without_imdb_id: usize,
}

/// One CSV row of the missing-movies report.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    movie_id: i64,
    original_title: &'a str,
    normalized_title: &'a str,
    release_year: String,
    genres: String,
    imdb_id_available: &'static str,
    imdb_id: &'a str,
    strategies_attempted: &'a str,
    error_reason: &'a str,
    timestamp: String,
}

impl<'a> From<&'a MissingRecordEntry> for ReportRow<'a> {
    fn from(entry: &'a MissingRecordEntry) -> Self {
        Self {
            movie_id: entry.movie_id,
            original_title: &entry.original_title,
            normalized_title: &entry.normalized_title,
            release_year: entry
                .release_year
                .map_or_else(|| NOT_AVAILABLE.to_string(), |y| y.to_string()),
            genres: if entry.genres.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                entry.genres.join("|")
            },
            imdb_id_available: if entry.imdb_id.is_some() { "Yes" } else { "No" },
            imdb_id: entry.imdb_id.as_deref().unwrap_or(NOT_AVAILABLE),
            strategies_attempted: &entry.strategies_attempted,
            error_reason: &entry.error_reason,
            timestamp: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Append-only collection of misses for one run.
#[derive(Debug, Default)]
pub struct EnrichmentReporter {
    entries: Vec<MissingRecordEntry>,
}

impl EnrichmentReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_miss(&mut self, entry: MissingRecordEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in processing order.
    pub fn entries(&self) -> &[MissingRecordEntry] {
        &self.entries
    }

    /// Counts over the current entries.
    pub fn summary(&self) -> MissingSummary {
        let with_imdb_id = self.entries.iter().filter(|e| e.imdb_id.is_some()).count();
        MissingSummary {
            total: self.entries.len(),
            with_imdb_id,
            without_imdb_id: self.entries.len() - with_imdb_id,
        }
    }

    /// Write all entries to `path`, drain them, and return their counts.
    ///
    /// With no entries nothing is written. A failed write is logged and the
    /// counts are still returned; the report is diagnostic only.
    pub fn flush(&mut self, path: &Path) -> MissingSummary {
        let summary = self.summary();

        if self.entries.is_empty() {
            tracing::info!("No missing movies to log");
        } else {
            match write_report(&self.entries, path) {
                Ok(()) => tracing::info!(
                    "Saved {} missing movies to {}",
                    summary.total,
                    path.display()
                ),
                Err(e) => tracing::error!("Error saving missing movies log: {}", e),
            }
        }

        tracing::info!("Missing Movies Summary:");
        tracing::info!("  - Total missing: {}", summary.total);
        tracing::info!("  - With IMDb ID available: {}", summary.with_imdb_id);
        tracing::info!("  - Without IMDb ID: {}", summary.without_imdb_id);

        self.entries.clear();
        summary
    }
}

/// Write entries as CSV, creating the parent directory if needed.
pub fn write_report(entries: &[MissingRecordEntry], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(format!("creating report directory {}", dir.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(format!("opening report {}", path.display()))?;
    for entry in entries {
        writer
            .serialize(ReportRow::from(entry))
            .with_context(format!("writing report row for movie {}", entry.movie_id))?;
    }
    writer
        .flush()
        .with_context(format!("flushing report {}", path.display()))?;

    Ok(())
}
