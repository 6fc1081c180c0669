//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`EnrichmentError`]) for detailed handling
//! - Fatal run-level failures ([`Error::SourceUnavailable`], [`Error::Database`])
//!   are distinct from per-record outcomes, which never surface as `Error`
//!
//! [`EnrichmentError`]: crate::enrichment::EnrichmentError
//!
//! # Example
//!
//! ```ignore
//! use movie_minder::error::{Error, Result, ResultExt};
//!
//! fn extract(path: &Path) -> Result<Vec<CatalogRecord>> {
//!     let records = source::read_catalog(path).with_context("reading catalog")?;
//!     Ok(records)
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error (connection, migration or transaction level)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required input source is missing
    #[error("Source not found: {0}")]
    SourceUnavailable(PathBuf),

    /// External metadata source error
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] crate::enrichment::EnrichmentError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a source-unavailable error.
    pub fn source_unavailable(path: impl Into<PathBuf>) -> Self {
        Self::SourceUnavailable(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error means an input file was missing.
    pub fn is_source_unavailable(&self) -> bool {
        match self {
            Self::SourceUnavailable(_) => true,
            Self::WithContext { source, .. } => source.is_source_unavailable(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Database(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, csv::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Csv(e).context(ctx))
    }
}
