//! Full pipeline command.

use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::db;
use crate::enrichment::EnrichmentService;
use crate::pipeline::{self, PipelineConfig};

use super::build_client;

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub movies: Option<PathBuf>,
    pub ratings: Option<PathBuf>,
    pub links: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub api_key: Option<String>,
    pub limit: Option<usize>,
    pub missing_log: Option<PathBuf>,
}

impl RunOverrides {
    /// Fold the overrides into `config`.
    fn apply(self, config: &mut Config) -> Option<String> {
        if let Some(path) = self.movies {
            config.sources.movies_csv = path;
        }
        if let Some(path) = self.ratings {
            config.sources.ratings_csv = path;
        }
        if let Some(path) = self.links {
            config.sources.links_csv = path;
        }
        if let Some(path) = self.db {
            config.database.path = path;
        }
        if let Some(limit) = self.limit {
            config.api.request_limit = limit;
        }
        if let Some(path) = self.missing_log {
            config.report.missing_movies_csv = path;
        }
        self.api_key
    }
}

/// Run extract, enrichment and load end to end
pub fn cmd_run(rt: &Runtime, mut config: Config, overrides: RunOverrides) -> anyhow::Result<()> {
    let api_key = overrides.apply(&mut config);
    let client = build_client(&config, api_key.as_deref())?;
    let service = EnrichmentService::new(client, config.api.enrichment_config());

    let pipeline_config = PipelineConfig {
        sources: config.sources.paths(),
        db_url: db::db_url(Some(&config.database.path)),
        missing_report: config.report.missing_movies_csv.clone(),
    };

    let summary = rt.block_on(pipeline::run(&pipeline_config, &service))?;

    println!(
        "Enriched {}/{} movies ({:.1}%), {} missing, {} via IMDb ID fallback",
        summary.enrichment.enriched,
        summary.enrichment.processed,
        summary.enrichment.success_rate(),
        summary.missing.total,
        summary.enrichment.imdb_fallback_hits
    );
    println!(
        "Loaded {} movies and {} ratings into {} ({} invalid ratings dropped)",
        summary.movies,
        summary.ratings_loaded,
        config.database.path.display(),
        summary.ratings_dropped
    );
    if summary.missing.total > 0 {
        println!(
            "Missing movies written to {} ({} with IMDb ID, {} without)",
            pipeline_config.missing_report.display(),
            summary.missing.with_imdb_id,
            summary.missing.without_imdb_id
        );
    }
    if summary.load_errors > 0 {
        eprintln!("{} rows failed to load; see log for details", summary.load_errors);
    }

    Ok(())
}
