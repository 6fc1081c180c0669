//! Internal domain models for movie lookup and enrichment.
//!
//! These types are OUR types - they don't change when the OMDb API changes.
//! API responses get converted into these types via the adapter.

use std::fmt;

/// A single request to the external metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieQuery {
    /// Search by normalized title, optionally constrained to a release year
    Title { title: String, year: Option<i32> },
    /// Direct lookup by IMDb identifier (e.g. "tt0114709")
    ImdbId(String),
}

impl MovieQuery {
    pub fn title(title: impl Into<String>, year: Option<i32>) -> Self {
        Self::Title {
            title: title.into(),
            year,
        }
    }

    pub fn imdb_id(id: impl Into<String>) -> Self {
        Self::ImdbId(id.into())
    }
}

impl fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title {
                title,
                year: Some(year),
            } => write!(f, "{} ({})", title, year),
            Self::Title { title, year: None } => write!(f, "{} (no year)", title),
            Self::ImdbId(id) => write!(f, "{}", id),
        }
    }
}

/// Metadata returned by a positive match, values as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetails {
    pub imdb_id: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
    /// Rating string as received (e.g. "7.7" or "N/A")
    pub imdb_rating: Option<String>,
    pub runtime: Option<String>,
}

impl MovieDetails {
    /// Rating as a number; absent or non-numeric values become `None`.
    pub fn coerced_rating(&self) -> Option<f64> {
        self.imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite())
    }
}

/// One lookup technique in the strategy chain, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Normalized title with the release year when one is known
    TitleYear,
    /// Normalized title without a year constraint
    TitleOnly,
    /// Direct lookup through the links table's IMDb identifier
    ImdbId,
}

impl MatchStrategy {
    /// Label used in logs and the missing-movies report.
    pub fn label(self) -> &'static str {
        match self {
            Self::TitleYear => "Title+Year",
            Self::TitleOnly => "Title Only",
            Self::ImdbId => "IMDb ID",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome label reported for a chain aborted by a transport failure.
pub const API_ERROR_LABEL: &str = "API Error";

/// How a record's strategy chain ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A strategy got a positive match
    Matched {
        strategy: MatchStrategy,
        details: MovieDetails,
    },
    /// Every applicable strategy came back negative
    Exhausted,
    /// A call failed at the transport layer; the chain stopped there
    ApiError(String),
}

/// Result of running the strategy chain for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchAttempt {
    pub movie_id: Option<i64>,
    /// Title actually sent to the external source
    pub normalized_title: String,
    /// Strategies attempted, in order
    pub attempted: Vec<MatchStrategy>,
    pub outcome: MatchOutcome,
}

impl MatchAttempt {
    /// Details and winning strategy on success.
    pub fn matched(&self) -> Option<(&MovieDetails, MatchStrategy)> {
        match &self.outcome {
            MatchOutcome::Matched { strategy, details } => Some((details, *strategy)),
            _ => None,
        }
    }

    /// Attempted strategy labels joined with commas.
    pub fn attempted_labels(&self) -> String {
        self.attempted
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The chain's reported outcome: the winning strategy, the attempted
    /// list on exhaustion, or "API Error" on a transport failure.
    pub fn outcome_label(&self) -> String {
        match &self.outcome {
            MatchOutcome::Matched { strategy, .. } => strategy.label().to_string(),
            MatchOutcome::Exhausted => self.attempted_labels(),
            MatchOutcome::ApiError(_) => API_ERROR_LABEL.to_string(),
        }
    }
}

/// Errors that can occur talking to the external metadata source.
///
/// Every variant is a transport-level failure from the strategy chain's
/// point of view; a negative match is not an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}
