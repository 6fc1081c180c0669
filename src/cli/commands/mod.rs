//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `run`: The full extract → enrich → load pipeline
//! - `lookup`: Single-title lookups and offline title normalization
//! - `settings`: Effective configuration and credential status

mod lookup;
mod run;
mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::enrichment::OmdbClient;

pub use lookup::{cmd_lookup, cmd_normalize};
pub use run::{RunOverrides, cmd_run};
pub use settings::cmd_config;

/// Movie Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full ETL pipeline
    Run {
        /// Movies CSV (movieId,title,genres)
        #[arg(long)]
        movies: Option<PathBuf>,
        /// Ratings CSV (userId,movieId,rating,timestamp)
        #[arg(long)]
        ratings: Option<PathBuf>,
        /// Links CSV (movieId,imdbId,tmdbId)
        #[arg(long)]
        links: Option<PathBuf>,
        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,
        /// OMDb API key (or set OMDB_API_KEY env var)
        #[arg(short, long, env = "OMDB_API_KEY")]
        api_key: Option<String>,
        /// Maximum records to enrich (0 = all)
        #[arg(long)]
        limit: Option<usize>,
        /// Where to write the missing-movies report
        #[arg(long)]
        missing_log: Option<PathBuf>,
    },
    /// Run the matching strategies for a single title
    Lookup {
        /// Raw catalog title, e.g. "Usual Suspects, The (1995)"
        title: String,
        /// Release year, if not embedded in the title
        #[arg(long)]
        year: Option<i32>,
        /// Catalog id used for the IMDb ID fallback
        #[arg(long)]
        movie_id: Option<i64>,
        /// OMDb API key (or set OMDB_API_KEY env var)
        #[arg(short, long, env = "OMDB_API_KEY")]
        api_key: Option<String>,
    },
    /// Show year extraction and normalization for a title (offline)
    Normalize {
        /// Raw catalog title
        title: String,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run {
            movies,
            ratings,
            links,
            db,
            api_key,
            limit,
            missing_log,
        } => {
            let rt = Runtime::new()?;
            let overrides = RunOverrides {
                movies: movies.clone(),
                ratings: ratings.clone(),
                links: links.clone(),
                db: db.clone(),
                api_key: api_key.clone(),
                limit: *limit,
                missing_log: missing_log.clone(),
            };
            cmd_run(&rt, load_config(cli), overrides)
        }
        Commands::Lookup {
            title,
            year,
            movie_id,
            api_key,
        } => {
            let rt = Runtime::new()?;
            cmd_lookup(&rt, &load_config(cli), title, *year, *movie_id, api_key.as_deref())
        }
        Commands::Normalize { title } => cmd_normalize(title),
        Commands::Config { init } => cmd_config(cli.config.as_deref(), *init),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// Build an OMDb client from the CLI key or the configured one.
///
/// Missing credentials are not fatal: every lookup will fail at the
/// transport layer and be reported as an API error.
pub(crate) fn build_client(config: &Config, api_key: Option<&str>) -> crate::error::Result<OmdbClient> {
    let key = api_key
        .map(str::to_string)
        .or_else(|| config.credentials.omdb_api_key.clone())
        .unwrap_or_else(|| {
            tracing::warn!("No OMDb API key configured; set OMDB_API_KEY or use --api-key");
            String::new()
        });

    Ok(OmdbClient::with_base_url(
        key,
        config.api.base_url.clone(),
        config.api.timeout(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_prefers_cli_key() {
        let mut config = Config::default();
        config.credentials.omdb_api_key = Some("file-key".to_string());

        assert!(build_client(&config, Some("cli-key")).is_ok());
        assert!(build_client(&Config::default(), None).is_ok());
    }
}
