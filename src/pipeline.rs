//! Extract → transform → load for one run.
//!
//! Extract and load failures (missing CSVs, database connection problems)
//! are fatal and abort the run. Per-record enrichment failures never are:
//! they end up in the missing-movies report instead.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::db;
use crate::enrichment::{
    EnrichmentService, EnrichmentStats, IdentifierResolver, MissingSummary, MovieMetadataApi,
    RunContext, enrich_and_report,
};
use crate::error::{Result, ResultExt};
use crate::source::{self, SourcePaths};

const SEPARATOR: &str =
    "================================================================================";

/// Everything a run needs besides the metadata client.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sources: SourcePaths,
    /// SQLite connection URL
    pub db_url: String,
    pub missing_report: PathBuf,
}

/// Counts reported at the end of a successful run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Catalog rows loaded
    pub movies: usize,
    pub enrichment: EnrichmentStats,
    pub missing: MissingSummary,
    pub ratings_loaded: usize,
    pub ratings_dropped: usize,
    /// Rows skipped across all load steps
    pub load_errors: usize,
    pub elapsed: Duration,
}

/// Run the full pipeline, logging the final status either way.
pub async fn run<A: MovieMetadataApi>(
    config: &PipelineConfig,
    service: &EnrichmentService<A>,
) -> Result<RunSummary> {
    tracing::info!("{}", SEPARATOR);
    tracing::info!("Starting ETL pipeline...");
    tracing::info!("{}", SEPARATOR);
    let start = Instant::now();

    match run_stages(config, service, start).await {
        Ok(summary) => {
            tracing::info!("{}", SEPARATOR);
            tracing::info!(
                "ETL pipeline completed successfully in {:.2} seconds",
                summary.elapsed.as_secs_f64()
            );
            tracing::info!(
                "Processed {} movies: {} enriched, {} missing",
                summary.enrichment.processed,
                summary.enrichment.enriched,
                summary.missing.total
            );
            tracing::info!("{}", SEPARATOR);
            Ok(summary)
        }
        Err(e) => {
            tracing::error!("{}", SEPARATOR);
            tracing::error!("ETL pipeline failed: {}", e);
            tracing::error!("{}", SEPARATOR);
            Err(e)
        }
    }
}

async fn run_stages<A: MovieMetadataApi>(
    config: &PipelineConfig,
    service: &EnrichmentService<A>,
    start: Instant,
) -> Result<RunSummary> {
    // Extract
    let data = source::load(&config.sources).with_context("extract")?;
    let mut catalog = data.catalog;
    let mut ctx = RunContext::new(IdentifierResolver::new(data.mapping));

    // Transform
    tracing::info!("Transforming movie data...");
    let (enrichment, missing) =
        enrich_and_report(service, &mut catalog, &mut ctx, &config.missing_report).await;

    // Load
    let pool = db::init_db(&config.db_url)
        .await
        .with_context(format!("connecting to {}", config.db_url))?;
    let movies = db::replace_movies(&pool, &catalog).await.with_context("load movies")?;
    let genres = db::replace_genres(&pool, &catalog).await.with_context("load genres")?;
    let ratings = db::replace_ratings(&pool, &data.ratings)
        .await
        .with_context("load ratings")?;
    pool.close().await;

    Ok(RunSummary {
        movies: catalog.len(),
        enrichment,
        missing,
        ratings_loaded: ratings.inserted,
        ratings_dropped: data.dropped_ratings,
        load_errors: movies.errors + genres.errors + ratings.errors,
        elapsed: start.elapsed(),
    })
}
